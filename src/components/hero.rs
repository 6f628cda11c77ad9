//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Smart Traffic Management"</h1>
            <p class="subtitle">
                "AI-assisted route analysis and blockchain-backed driver credentials. "
                "Connect a wallet to register a driver; verification is open to everyone."
            </p>
        </div>
    }
}
