//! Tab navigation.

use leptos::*;

/// The application's four feature tabs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Route,
    Verify,
    Register,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Route, Tab::Verify, Tab::Register];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Overview",
            Tab::Route => "Route Analysis",
            Tab::Verify => "Driver Verification",
            Tab::Register => "Driver Registration",
        }
    }
}

#[component]
pub fn TabBar(active: ReadSignal<Tab>, set_active: WriteSignal<Tab>) -> impl IntoView {
    view! {
        <div class="tabs">
            {Tab::ALL
                .into_iter()
                .map(|tab| {
                    view! {
                        <button
                            class="tab"
                            class:active=move || active.get() == tab
                            on:click=move |_| set_active.set(tab)
                        >
                            {tab.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
