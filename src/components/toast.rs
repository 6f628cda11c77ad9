//! Toast notifications with auto-dismiss.

use gloo_timers::future::TimeoutFuture;
use leptos::*;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
}

impl ToastKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub text: String,
    pub kind: ToastKind,
}

/// Show a toast and clear it after the configured delay.
pub fn show_toast(
    set_toast: WriteSignal<Option<ToastMessage>>,
    kind: ToastKind,
    text: &str,
) {
    log::info!("{text}");
    set_toast.set(Some(ToastMessage {
        text: text.to_string(),
        kind,
    }));
    spawn_local(async move {
        TimeoutFuture::new(config::TOAST_DISMISS_MS).await;
        set_toast.set(None);
    });
}

#[component]
pub fn Toast(toast: ReadSignal<Option<ToastMessage>>) -> impl IntoView {
    view! {
        <Show when=move || toast.get().is_some() fallback=|| view! {}>
            <div class=move || {
                toast
                    .get()
                    .map(|t| format!("toast {}", t.kind.css_class()))
                    .unwrap_or_default()
            }>
                {move || toast.get().map(|t| t.text).unwrap_or_default()}
            </div>
        </Show>
    }
}
