//! Overview panel: aggregate statistics, hotspots and chain health.
//!
//! Loaded once when the panel mounts.

use leptos::*;
use serde_json::Value;

use crate::components::tabs::Tab;
use crate::services::api::ApiClient;
use crate::types::Statistics;

#[component]
pub fn StatsPanel(api: ApiClient, set_active: WriteSignal<Tab>) -> impl IntoView {
    let (stats, set_stats) = create_signal(None::<Statistics>);
    let (hotspots, set_hotspots) = create_signal(Vec::<Value>::new());
    let (chain_status, set_chain_status) = create_signal(None::<String>);

    spawn_local(async move {
        match api.get_statistics().await {
            Ok(statistics) => set_stats.set(Some(statistics)),
            Err(e) => log::error!("Failed to load statistics: {e}"),
        }
        match api.get_accident_hotspots().await {
            Ok(entries) => set_hotspots.set(entries),
            Err(e) => log::error!("Failed to load hotspots: {e}"),
        }
        match api.get_blockchain_status().await {
            Ok(status) => set_chain_status.set(Some(summarize_chain_status(&status))),
            Err(e) => log::error!("Failed to load blockchain status: {e}"),
        }
    });

    view! {
        <div class="panel stats-panel">
            <div class="stat-tiles">
                <div class="stat-tile">
                    <div class="stat-value">
                        {move || {
                            stats
                                .get()
                                .and_then(|s| s.accidents)
                                .map(|a| a.total_accidents.to_string())
                                .unwrap_or_else(|| "--".to_string())
                        }}
                    </div>
                    <div class="stat-label">"Total accidents on record"</div>
                </div>
                <div class="stat-tile">
                    <div class="stat-value">{move || hotspots.get().len()}</div>
                    <div class="stat-label">"Accident hotspots"</div>
                </div>
            </div>

            <Show when=move || chain_status.get().is_some() fallback=|| view! {}>
                <p class="chain-status">"⛓️ " {move || chain_status.get().unwrap_or_default()}</p>
            </Show>

            <Show when=move || !hotspots.get().is_empty() fallback=|| view! {}>
                <ul class="hotspot-list">
                    {move || {
                        hotspots
                            .get()
                            .iter()
                            .map(|entry| view! { <li>{hotspot_label(entry)}</li> })
                            .collect_view()
                    }}
                </ul>
            </Show>

            <div class="feature-cards">
                <div class="feature-card" on:click=move |_| set_active.set(Tab::Route)>
                    <h3>"🚦 Route Analysis"</h3>
                    <p>"Compare congestion and risk between two routes."</p>
                </div>
                <div class="feature-card" on:click=move |_| set_active.set(Tab::Verify)>
                    <h3>"🪪 Driver Verification"</h3>
                    <p>"Check a driver's documents and on-chain record."</p>
                </div>
                <div class="feature-card" on:click=move |_| set_active.set(Tab::Register)>
                    <h3>"📝 Driver Registration"</h3>
                    <p>"Register a driver profile anchored on Polygon Mumbai."</p>
                </div>
            </div>
        </div>
    }
}

/// Best-effort display label for a hotspot entry; the shape is
/// backend-defined and passed through.
fn hotspot_label(entry: &Value) -> String {
    entry
        .get("location")
        .or_else(|| entry.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| entry.to_string())
}

fn summarize_chain_status(status: &Value) -> String {
    let network = status.get("network").and_then(|v| v.as_str());
    let connected = status.get("connected").and_then(|v| v.as_bool());
    match (network, connected) {
        (Some(network), Some(true)) => format!("Connected to {network}"),
        (Some(network), Some(false)) => format!("Not connected to {network}"),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hotspot_label_prefers_named_fields() {
        assert_eq!(hotspot_label(&json!({"location": "Third Mainland Bridge"})), "Third Mainland Bridge");
        assert_eq!(hotspot_label(&json!({"name": "Ikeja"})), "Ikeja");
        assert_eq!(hotspot_label(&json!({"lat": 6.5})), r#"{"lat":6.5}"#);
    }

    #[test]
    fn chain_status_summary_reads_common_fields() {
        assert_eq!(
            summarize_chain_status(&json!({"network": "Polygon Mumbai", "connected": true})),
            "Connected to Polygon Mumbai"
        );
        assert_eq!(
            summarize_chain_status(&json!({"network": "Polygon Mumbai", "connected": false})),
            "Not connected to Polygon Mumbai"
        );
    }
}
