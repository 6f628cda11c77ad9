//! Smart Traffic - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for route prediction, driver verification
//! and blockchain-backed driver registration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (wallet connection, network, balance)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── TabBar (Overview / Route / Verify / Register)          │
//! │  └── active tab panel                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer · Toast                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Wire types, wallet state, error enums
//! - [`components`] - UI components (Header, tabs, panels, etc.)
//! - [`services`] - Backend API client and wallet session

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // API
    ApiEnvelope, ApiError,
    // Routes
    Recommendation, RiskLevel, RouteLeg, RoutePrediction, RouteQuery,
    // Drivers
    BlockchainInfo, DocumentValidity, DriverInfo, RegisteredDriver, RegistrationReceipt,
    RegistrationRequest, VerificationReport,
    // Statistics
    AccidentStats, Statistics,
    // Wallet
    NativeCurrency, NetworkDescriptor, WalletSnapshot, WalletState,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🚦 Smart Traffic - Starting Leptos App");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Smart Traffic"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Service objects; constructed once, handed to components.
    let api = ApiClient::new();
    let session = WalletSession::detect();

    // Global state for the application
    let (active_tab, set_active_tab) = create_signal(Tab::Home);
    let (wallet, set_wallet) = create_signal(WalletSnapshot::default());
    let (toast, set_toast) = create_signal(None::<ToastMessage>);

    // Every session transition lands in the wallet signal.
    session.subscribe(move |snapshot| set_wallet.set(snapshot));

    // Boot-time diagnostics: probe the backend once.
    {
        let api = api.clone();
        spawn_local(async move {
            match api.health_check().await {
                Ok(body) => log::info!("✅ Backend connected: {body}"),
                Err(e) => {
                    log::error!("❌ Backend connection failed: {e}");
                    show_toast(
                        set_toast,
                        ToastKind::Warning,
                        "Warning: Backend API not responding",
                    );
                }
            }
        });
    }

    // Silently resume a wallet that already authorized this origin.
    {
        let session = session.clone();
        spawn_local(async move {
            if session.resume_if_authorized().await.is_some() {
                show_toast(set_toast, ToastKind::Success, "Wallet reconnected");
            }
        });
    }

    let api_home = api.clone();
    let api_route = api.clone();
    let api_verify = api.clone();
    let session_header = session.clone();

    view! {
        <Header session=session_header wallet=wallet set_toast=set_toast/>

        <div class="container">
            <Hero/>
            <TabBar active=active_tab set_active=set_active_tab/>

            <Show when=move || active_tab.get() == Tab::Home fallback=|| view! {}>
                <StatsPanel api=api_home.clone() set_active=set_active_tab/>
            </Show>
            <Show when=move || active_tab.get() == Tab::Route fallback=|| view! {}>
                <RouteTab api=api_route.clone() set_toast=set_toast/>
            </Show>
            <Show when=move || active_tab.get() == Tab::Verify fallback=|| view! {}>
                <VerifyTab api=api_verify.clone() wallet=wallet set_toast=set_toast/>
            </Show>
            <Show when=move || active_tab.get() == Tab::Register fallback=|| view! {}>
                <RegisterTab api=api.clone() wallet=wallet set_toast=set_toast/>
            </Show>
        </div>

        <Footer/>
        <Toast toast=toast/>
    }
}
