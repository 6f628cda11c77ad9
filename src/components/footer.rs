//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>"Smart Traffic demo • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="https://mumbai.polygonscan.com" class="footer-link" target="_blank">
                    "PolygonScan"
                </a>
                <a href="https://faucet.polygon.technology/" class="footer-link" target="_blank">
                    "Faucet"
                </a>
            </div>
        </footer>
    }
}
