//! Application configuration.
//!
//! Centralized configuration for the Smart Traffic frontend.
//! The API base URL is resolved once at startup from the page hostname;
//! everything else is hardcoded for the demo deployment.

use crate::types::{NativeCurrency, NetworkDescriptor};

/// Backend API base URL when the page is served from a local host.
pub const LOCAL_API_URL: &str = "http://localhost:5000/api";

/// Backend API base URL for the deployed demo.
pub const REMOTE_API_URL: &str = "https://trac-backend.onrender.com/api";

/// Application name, displayed in the header and page title.
pub const APP_NAME: &str = "Smart Traffic";

/// Chain id of the network every session is steered onto.
///
/// Polygon Mumbai Testnet (80001).
pub const TARGET_CHAIN_ID: &str = "0x13881";

/// Ticker of the target network's native currency.
pub const NATIVE_SYMBOL: &str = "MATIC";

/// Decimals of the native currency (wei-style smallest unit).
pub const NATIVE_DECIMALS: u32 = 18;

/// Faucet for test funds on the target network.
pub const FAUCET_URL: &str = "https://faucet.polygon.technology/";

/// How long a toast notification stays on screen.
pub const TOAST_DISMISS_MS: u32 = 3000;

/// Resolve the backend base URL from the page hostname.
///
/// Loopback hosts talk to a local backend, anything else to the
/// deployed one. Called once at client construction; the result is
/// immutable afterwards.
pub fn api_base_url() -> String {
    let hostname = gloo_utils::window()
        .location()
        .hostname()
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        LOCAL_API_URL.to_string()
    } else {
        REMOTE_API_URL.to_string()
    }
}

/// Full descriptor of the target network, in the shape the wallet's
/// add-chain call expects.
pub fn target_network() -> NetworkDescriptor {
    NetworkDescriptor {
        chain_id: TARGET_CHAIN_ID.to_string(),
        chain_name: "Polygon Mumbai Testnet".to_string(),
        native_currency: NativeCurrency {
            name: "MATIC".to_string(),
            symbol: NATIVE_SYMBOL.to_string(),
            decimals: 18,
        },
        rpc_urls: vec!["https://rpc-mumbai.maticvigil.com".to_string()],
        block_explorer_urls: vec!["https://mumbai.polygonscan.com".to_string()],
    }
}
