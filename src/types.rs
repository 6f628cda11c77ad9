//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **API Envelope** - Response wrapper shared by all backend endpoints
//! - **Route Types** - Route prediction results
//! - **Driver Types** - Verification and registration payloads
//! - **Statistics Types** - Aggregate counters for the home panel
//! - **Wallet Types** - Session state and network metadata
//! - **Error Types** - Frontend error handling
//!
//! Field names follow the backend's snake_case wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// API Envelope
// =============================================================================

/// Response envelope shared by every API endpoint.
///
/// Exactly one of `data`/`error` is meaningful, keyed off `success`.
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Route Types
// =============================================================================

/// Route prediction request body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteQuery {
    pub start_location: String,
    pub end_location: String,
}

/// Risk classification of a single route.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Medium => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Which of the two compared routes the backend recommends.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Main,
    Alternative,
}

/// One leg of a route comparison.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteLeg {
    pub name: String,
    /// Congestion in percent, 0-100.
    pub congestion_level: u8,
    pub accidents_reported: u32,
    pub estimated_time_minutes: f64,
    pub distance_km: f64,
    pub risk_level: RiskLevel,
}

/// Comparison between the current route and an alternative.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutePrediction {
    pub main_route: RouteLeg,
    pub alternative_route: RouteLeg,
    pub recommendation: Recommendation,
    /// Minutes saved by taking the alternative. Zero or negative when
    /// the main route wins.
    pub time_difference_minutes: f64,
}

impl RoutePrediction {
    pub fn recommended_leg(&self) -> &RouteLeg {
        match self.recommendation {
            Recommendation::Main => &self.main_route,
            Recommendation::Alternative => &self.alternative_route,
        }
    }
}

// =============================================================================
// Driver Types
// =============================================================================

/// Driver identity plus the three tracked document validities.
///
/// The `*_valid` flags are derived by the backend as `expiry >= today`;
/// `all_documents_valid` is the conjunction of the three.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DriverInfo {
    pub full_name: String,
    pub license_number: String,
    pub license_expiry: String,
    pub license_valid: bool,
    pub insurance_number: String,
    pub insurance_expiry: String,
    pub insurance_valid: bool,
    pub vehicle_number: String,
    pub road_worthiness: String,
    pub road_worthiness_expiry: String,
    pub road_worthiness_valid: bool,
    pub all_documents_valid: bool,
}

/// On-chain attestation attached to a verified driver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlockchainInfo {
    pub blockchain_hash: String,
    pub verified_on_chain: bool,
    pub wallet_address: String,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

/// Full driver verification result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VerificationReport {
    pub driver_info: DriverInfo,
    pub blockchain_info: BlockchainInfo,
}

/// Validity flags only, for the lightweight check endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentValidity {
    pub license_valid: bool,
    pub insurance_valid: bool,
    pub road_worthiness_valid: bool,
    pub all_documents_valid: bool,
}

/// Registration form payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_expiry: String,
    pub vehicle_plate: String,
    pub insurance_provider: String,
    pub insurance_expiry: String,
    pub road_cert_number: String,
    pub cert_expiry: String,
    pub wallet_address: String,
}

/// Identity fields echoed back by the registration endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredDriver {
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub wallet_address: String,
}

/// Raw registration response. Unlike the other endpoints this one is
/// flat rather than wrapped in `data`.
#[derive(Clone, Debug, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub driver: Option<RegisteredDriver>,
    #[serde(default)]
    pub blockchain_tx: Option<String>,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

/// Normalized registration outcome handed to the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrationReceipt {
    pub driver: RegisteredDriver,
    pub blockchain_tx: String,
    pub explorer_url: Option<String>,
}

/// Document-expiry rule used for client-side pre-checks.
///
/// A date equal to `today` still counts as valid, matching the
/// backend's derivation. Unparseable dates count as expired.
pub fn expiry_is_valid(expiry: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(expiry.trim(), "%Y-%m-%d")
        .map(|date| date >= today)
        .unwrap_or(false)
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Accident counters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AccidentStats {
    pub total_accidents: u64,
}

/// Aggregate statistics for the home panel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    #[serde(default)]
    pub accidents: Option<AccidentStats>,
}

// =============================================================================
// Wallet Types
// =============================================================================

/// Wallet session lifecycle.
///
/// Owned exclusively by `WalletSession`; everything else reads
/// [`WalletSnapshot`] values.
#[derive(Clone, Debug, PartialEq)]
pub enum WalletState {
    Disconnected,
    Connecting,
    Connected {
        address: String,
        chain_id: Option<String>,
        /// True when the address was synthesized locally because no
        /// usable provider was available.
        demo: bool,
    },
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletState::Connected { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            WalletState::Connected { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn chain_id(&self) -> Option<&str> {
        match self {
            WalletState::Connected { chain_id, .. } => chain_id.as_deref(),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        match self {
            WalletState::Connected {
                address,
                chain_id,
                demo,
            } => WalletSnapshot {
                connected: true,
                address: Some(address.clone()),
                chain_id: chain_id.clone(),
                demo: *demo,
            },
            _ => WalletSnapshot::default(),
        }
    }
}

/// Read-only view of the wallet state, handed to subscribers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalletSnapshot {
    pub connected: bool,
    pub address: Option<String>,
    pub chain_id: Option<String>,
    pub demo: bool,
}

/// Network metadata in the shape the wallet's add-chain call expects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

// =============================================================================
// Error Types
// =============================================================================

/// Failure of an API operation.
///
/// `Backend` carries the backend's structured error string verbatim;
/// `Transport` wraps network or decoding failures. Both display as a
/// human-readable message.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiError {
    /// Network unreachable or malformed response.
    Transport(String),
    /// Non-2xx status or `success: false` envelope.
    Backend(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(msg) | ApiError::Backend(msg) => msg,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_parses_lowercase() {
        let level: RiskLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(level.to_string(), "medium");
    }

    #[test]
    fn expiry_today_counts_as_valid() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(expiry_is_valid("2025-06-15", today));
        assert!(expiry_is_valid("2026-01-01", today));
        assert!(!expiry_is_valid("2025-06-14", today));
        assert!(!expiry_is_valid("not a date", today));
    }

    #[test]
    fn all_documents_valid_is_conjunction() {
        let json = r#"{
            "full_name": "Ada Obi",
            "license_number": "LIC-001",
            "license_expiry": "2026-01-01",
            "license_valid": true,
            "insurance_number": "INS-44",
            "insurance_expiry": "2024-01-01",
            "insurance_valid": false,
            "vehicle_number": "ABC-123",
            "road_worthiness": "RW-9",
            "road_worthiness_expiry": "2026-01-01",
            "road_worthiness_valid": true,
            "all_documents_valid": false
        }"#;

        let info: DriverInfo = serde_json::from_str(json).unwrap();
        assert_eq!(
            info.all_documents_valid,
            info.license_valid && info.insurance_valid && info.road_worthiness_valid
        );
    }

    #[test]
    fn registration_round_trips_identity_fields() {
        let request = RegistrationRequest {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            license_number: "LIC-001".to_string(),
            wallet_address: "0xabc".to_string(),
            ..Default::default()
        };

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["first_name"], "Ada");
        assert_eq!(wire["license_number"], "LIC-001");
        assert_eq!(wire["wallet_address"], "0xabc");

        // The identity the backend echoes back must agree with what
        // was submitted under the same field names.
        let echoed: RegisteredDriver = serde_json::from_value(serde_json::json!({
            "first_name": wire["first_name"],
            "last_name": wire["last_name"],
            "license_number": wire["license_number"],
            "wallet_address": wire["wallet_address"],
        }))
        .unwrap();
        assert_eq!(echoed.first_name, request.first_name);
        assert_eq!(echoed.license_number, request.license_number);
    }

    #[test]
    fn wallet_state_snapshot_reflects_connection() {
        let state = WalletState::Connected {
            address: "0xfeed".to_string(),
            chain_id: Some("0x13881".to_string()),
            demo: false,
        };
        let snapshot = state.snapshot();
        assert!(snapshot.connected);
        assert_eq!(snapshot.address.as_deref(), Some("0xfeed"));
        assert_eq!(snapshot.chain_id.as_deref(), Some("0x13881"));

        assert_eq!(WalletState::Connecting.snapshot(), WalletSnapshot::default());
    }

    #[test]
    fn network_descriptor_serializes_camel_case() {
        let descriptor = crate::config::target_network();
        let wire = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(wire["chainId"], "0x13881");
        assert_eq!(wire["nativeCurrency"]["decimals"], 18);
        assert!(wire["rpcUrls"].is_array());
        assert!(wire["blockExplorerUrls"].is_array());
    }
}
