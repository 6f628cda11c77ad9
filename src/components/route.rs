//! Route prediction tab.
//!
//! Collects a start/end pair and renders the backend's comparison of
//! the current route against its alternative.

use leptos::*;

use crate::components::toast::{show_toast, ToastKind, ToastMessage};
use crate::services::api::ApiClient;
use crate::types::{Recommendation, RouteLeg, RoutePrediction};

#[component]
pub fn RouteTab(api: ApiClient, set_toast: WriteSignal<Option<ToastMessage>>) -> impl IntoView {
    let (start, set_start) = create_signal(String::new());
    let (end, set_end) = create_signal(String::new());
    let (result, set_result) = create_signal(None::<RoutePrediction>);
    let (is_loading, set_is_loading) = create_signal(false);

    let on_analyze = move |_| {
        let start_location = start.get().trim().to_string();
        let end_location = end.get().trim().to_string();
        if start_location.is_empty() || end_location.is_empty() {
            show_toast(set_toast, ToastKind::Error, "Please enter both locations");
            return;
        }

        let api = api.clone();
        set_is_loading.set(true);
        set_result.set(None);
        spawn_local(async move {
            match api.predict_route(&start_location, &end_location).await {
                Ok(prediction) => {
                    set_result.set(Some(prediction));
                    show_toast(set_toast, ToastKind::Success, "Route analysis complete!");
                }
                Err(e) => {
                    log::error!("Route prediction error: {e}");
                    show_toast(
                        set_toast,
                        ToastKind::Error,
                        &format!("Failed to analyze route: {e}"),
                    );
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="panel route-panel">
            <div class="form-row">
                <input
                    type="text"
                    placeholder="Start location"
                    prop:value=start
                    on:input=move |ev| set_start.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Destination"
                    prop:value=end
                    on:input=move |ev| set_end.set(event_target_value(&ev))
                />
                <button class="primary" on:click=on_analyze disabled=move || is_loading.get()>
                    {move || if is_loading.get() { "Analyzing..." } else { "Analyze Route" }}
                </button>
            </div>

            <Show when=move || result.get().is_some() fallback=|| view! {}>
                {move || {
                    result
                        .get()
                        .map(|prediction| {
                            view! {
                                <div class="route-results">
                                    <RouteCard
                                        title="Current Route"
                                        leg=prediction.main_route.clone()
                                        recommended={prediction.recommendation == Recommendation::Main}
                                        time_saved=None
                                    />
                                    <RouteCard
                                        title="Alternative Route"
                                        leg=prediction.alternative_route.clone()
                                        recommended={prediction.recommendation == Recommendation::Alternative}
                                        time_saved=Some(prediction.time_difference_minutes)
                                    />
                                </div>
                            }
                        })
                }}
            </Show>
        </div>
    }
}

#[component]
fn RouteCard(
    title: &'static str,
    leg: RouteLeg,
    recommended: bool,
    time_saved: Option<f64>,
) -> impl IntoView {
    view! {
        <div class="route-card" class:recommended=move || recommended>
            <h3>{title}</h3>
            <p><strong>{leg.name.clone()}</strong></p>
            <p>"🚗 Congestion: " {leg.congestion_level} "%"</p>
            <p>"⚠️ Accidents reported: " {leg.accidents_reported}</p>
            <p>"⏱️ Estimated time: " {format!("{:.0} mins", leg.estimated_time_minutes)}</p>
            <p>"📏 Distance: " {format!("{} km", leg.distance_km)}</p>
            <p class=leg.risk_level.css_class()>"⚡ Risk level: " {leg.risk_level.to_string()}</p>
            <Show when=move || recommended fallback=|| view! {}>
                <p class="recommended-note">"✅ Recommended route"</p>
            </Show>
            {time_saved
                .filter(|delta| *delta > 0.0)
                .map(|delta| view! { <p class="time-saved">{format!("⏰ Save {delta:.0} minutes!")}</p> })}
        </div>
    }
}
