//! Backend and wallet services.
//!
//! This module provides the two service objects the UI talks to:
//!
//! # Services
//!
//! - [`api`] - HTTP client for the Smart Traffic backend
//! - [`provider`] - Injected wallet provider capability (MetaMask etc.)
//! - [`wallet`] - Wallet session and network negotiation
//!
//! Both services are plain constructed objects; nothing here installs
//! global state.

pub mod api;
pub mod provider;
pub mod wallet;

pub use api::*;
pub use provider::*;
pub use wallet::*;
