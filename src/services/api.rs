//! HTTP client for the Smart Traffic backend API.
//!
//! Every operation translates a typed request into one fetch against
//! the configured base URL and normalizes the outcome: non-2xx
//! statuses become [`ApiError::Backend`] with the body's structured
//! `error` string when present, transport and decoding failures become
//! [`ApiError::Transport`]. No retries, no timeouts, no caching: each
//! call is a fresh request and idempotence is the backend's problem.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config;
use crate::types::{
    ApiEnvelope, ApiError, DocumentValidity, RegistrationReceipt, RegistrationRequest,
    RegistrationResponse, RouteQuery, RoutePrediction, Statistics, VerificationReport,
};

/// Backend API client. Construct once and hold a reference; the base
/// URL is fixed at construction.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Client against the environment-resolved backend.
    pub fn new() -> Self {
        let base_url = config::api_base_url();
        log::info!("🔗 API base URL: {base_url}");
        Self { base_url }
    }

    /// Client against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compare the route between two locations against its alternative.
    pub async fn predict_route(
        &self,
        start_location: &str,
        end_location: &str,
    ) -> Result<RoutePrediction, ApiError> {
        let query = RouteQuery {
            start_location: start_location.trim().to_string(),
            end_location: end_location.trim().to_string(),
        };
        self.post("/predict/route", &query, "Prediction failed").await
    }

    /// Look up a driver by license number.
    pub async fn verify_driver(
        &self,
        license_number: &str,
    ) -> Result<VerificationReport, ApiError> {
        self.post(
            "/verify/driver",
            &serde_json::json!({ "license_number": license_number }),
            "Verification failed",
        )
        .await
    }

    /// Register a new driver; yields the created identity plus the
    /// transaction hash of the on-chain record.
    pub async fn register_driver(
        &self,
        registration: &RegistrationRequest,
    ) -> Result<RegistrationReceipt, ApiError> {
        let response = Request::post(&format!("{}/auth/register", self.base_url))
            .json(registration)
            .map_err(|e| ApiError::Transport(format!("Failed to build request: {e}")))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(backend_rejection(&body, "Registration failed"));
        }

        let body: RegistrationResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {e}")))?;
        registration_receipt(body)
    }

    pub async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        self.get("/predict/statistics", "Failed to fetch statistics")
            .await
    }

    /// Accident hotspots; shape is backend-defined and passed through.
    pub async fn get_accident_hotspots(&self) -> Result<Vec<Value>, ApiError> {
        self.get("/predict/accident-hotspots", "Failed to fetch hotspots")
            .await
    }

    /// Validity flags for a license, without the full driver record.
    pub async fn check_document_validity(
        &self,
        license_number: &str,
    ) -> Result<DocumentValidity, ApiError> {
        let path = format!("/verify/check-validity/{}", encode_path_segment(license_number));
        self.get(&path, "Failed to check validity").await
    }

    /// Same report as [`verify_driver`], looked up by wallet address.
    ///
    /// [`verify_driver`]: ApiClient::verify_driver
    pub async fn verify_by_wallet(
        &self,
        wallet_address: &str,
    ) -> Result<VerificationReport, ApiError> {
        let path = format!("/verify/wallet/{}", encode_path_segment(wallet_address));
        self.get(&path, "Verification failed").await
    }

    /// Chain connectivity info; shape is backend-defined.
    pub async fn get_blockchain_status(&self) -> Result<Value, ApiError> {
        self.get("/verify/blockchain-status", "Failed to get blockchain status")
            .await
    }

    /// Liveness probe against the service root (not under the API
    /// prefix). Boot-time diagnostic only: no envelope normalization,
    /// failures surface as-is.
    pub async fn health_check(&self) -> Result<Value, ApiError> {
        let url = format!("{}/health", service_root(&self.base_url));
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::Backend("Health check failed".to_string()));
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        let response = Request::get(&format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::normalize(response, fallback).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = Request::post(&format!("{}{path}", self.base_url))
            .json(body)
            .map_err(|e| ApiError::Transport(format!("Failed to build request: {e}")))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::normalize(response, fallback).await
    }

    async fn normalize<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(backend_rejection(&body, fallback));
        }
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {e}")))?;
        unwrap_envelope(envelope, fallback)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the API prefix off the base URL to reach the service root.
fn service_root(base_url: &str) -> String {
    base_url
        .trim_end_matches('/')
        .strip_suffix("/api")
        .unwrap_or(base_url)
        .to_string()
}

/// Extract the structured `error` string from a rejection body,
/// falling back to the operation's generic message.
fn backend_rejection(body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string());
    ApiError::Backend(message)
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>, fallback: &str) -> Result<T, ApiError> {
    if !envelope.success {
        return Err(ApiError::Backend(
            envelope.error.unwrap_or_else(|| fallback.to_string()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Transport("Response envelope carried no data".to_string()))
}

fn registration_receipt(body: RegistrationResponse) -> Result<RegistrationReceipt, ApiError> {
    if !body.success {
        return Err(ApiError::Backend(
            body.error.unwrap_or_else(|| "Registration failed".to_string()),
        ));
    }
    let driver = body.driver.ok_or_else(|| {
        ApiError::Transport("Registration response carried no driver".to_string())
    })?;
    let blockchain_tx = body.blockchain_tx.ok_or_else(|| {
        ApiError::Transport("Registration response carried no transaction hash".to_string())
    })?;
    Ok(RegistrationReceipt {
        driver,
        blockchain_tx,
        explorer_url: body.explorer_url,
    })
}

fn encode_path_segment(raw: &str) -> String {
    js_sys::encode_uri_component(raw).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Recommendation, RiskLevel};

    #[test]
    fn service_root_strips_trailing_api_segment() {
        assert_eq!(service_root("http://localhost:5000/api"), "http://localhost:5000");
        assert_eq!(
            service_root("https://trac-backend.onrender.com/api"),
            "https://trac-backend.onrender.com"
        );
        assert_eq!(service_root("http://localhost:5000"), "http://localhost:5000");
    }

    #[test]
    fn rejection_body_error_is_surfaced_verbatim() {
        // 404 from the validity endpoint.
        let err = backend_rejection(
            r#"{"success": false, "error": "not found"}"#,
            "Failed to check validity",
        );
        assert_eq!(err, ApiError::Backend("not found".to_string()));
    }

    #[test]
    fn rejection_without_structured_error_uses_fallback() {
        let err = backend_rejection("<html>502 Bad Gateway</html>", "Prediction failed");
        assert_eq!(err, ApiError::Backend("Prediction failed".to_string()));
    }

    #[test]
    fn statistics_envelope_yields_displayable_total() {
        let envelope: ApiEnvelope<Statistics> = serde_json::from_str(
            r#"{"success": true, "data": {"accidents": {"total_accidents": 42}}}"#,
        )
        .unwrap();
        let stats = unwrap_envelope(envelope, "Failed to fetch statistics").unwrap();
        assert_eq!(stats.accidents.unwrap().total_accidents, 42);
    }

    #[test]
    fn failed_envelope_with_200_status_is_a_backend_error() {
        let envelope: ApiEnvelope<Statistics> =
            serde_json::from_str(r#"{"success": false, "error": "model unavailable"}"#).unwrap();
        let err = unwrap_envelope(envelope, "Failed to fetch statistics").unwrap_err();
        assert_eq!(err, ApiError::Backend("model unavailable".to_string()));
    }

    #[test]
    fn route_prediction_envelope_deserializes() {
        let json = r#"{
            "success": true,
            "data": {
                "main_route": {
                    "name": "Ikorodu Road",
                    "congestion_level": 87,
                    "accidents_reported": 3,
                    "estimated_time_minutes": 55.0,
                    "distance_km": 12.4,
                    "risk_level": "high"
                },
                "alternative_route": {
                    "name": "Gbagada Expressway",
                    "congestion_level": 34,
                    "accidents_reported": 0,
                    "estimated_time_minutes": 38.5,
                    "distance_km": 15.1,
                    "risk_level": "low"
                },
                "recommendation": "alternative",
                "time_difference_minutes": 16.5
            }
        }"#;

        let envelope: ApiEnvelope<RoutePrediction> = serde_json::from_str(json).unwrap();
        let prediction = unwrap_envelope(envelope, "Prediction failed").unwrap();
        assert_eq!(prediction.recommendation, Recommendation::Alternative);
        assert_eq!(prediction.recommended_leg().name, "Gbagada Expressway");
        assert_eq!(prediction.main_route.risk_level, RiskLevel::High);
        assert!(prediction.time_difference_minutes > 0.0);
    }

    #[test]
    fn negative_time_difference_is_accepted() {
        // The main route can win; the delta is then zero or negative.
        let json = r#"{
            "name": "A", "congestion_level": 10, "accidents_reported": 0,
            "estimated_time_minutes": 10.0, "distance_km": 5.0, "risk_level": "low"
        }"#;
        let leg: crate::types::RouteLeg = serde_json::from_str(json).unwrap();
        let prediction = RoutePrediction {
            main_route: leg.clone(),
            alternative_route: leg,
            recommendation: Recommendation::Main,
            time_difference_minutes: -4.0,
        };
        assert_eq!(prediction.recommended_leg().name, "A");
    }

    #[test]
    fn verification_report_deserializes_with_attestation() {
        let json = r#"{
            "driver_info": {
                "full_name": "Ada Obi",
                "license_number": "LIC-001",
                "license_expiry": "2026-03-01",
                "license_valid": true,
                "insurance_number": "INS-44",
                "insurance_expiry": "2026-03-01",
                "insurance_valid": true,
                "vehicle_number": "ABC-123",
                "road_worthiness": "RW-9",
                "road_worthiness_expiry": "2026-03-01",
                "road_worthiness_valid": true,
                "all_documents_valid": true
            },
            "blockchain_info": {
                "blockchain_hash": "0xdeadbeef",
                "verified_on_chain": true,
                "wallet_address": "0xfeedface",
                "explorer_url": "https://mumbai.polygonscan.com/tx/0xdeadbeef"
            }
        }"#;

        let report: VerificationReport = serde_json::from_str(json).unwrap();
        assert!(report.driver_info.all_documents_valid);
        assert!(report.blockchain_info.verified_on_chain);
        assert!(report.blockchain_info.explorer_url.is_some());
    }

    #[test]
    fn registration_receipt_requires_driver_and_hash() {
        let ok: RegistrationResponse = serde_json::from_str(
            r#"{
                "success": true,
                "driver": {
                    "first_name": "Ada", "last_name": "Obi",
                    "license_number": "LIC-001", "wallet_address": "0xfeed"
                },
                "blockchain_tx": "0xbeef",
                "explorer_url": null
            }"#,
        )
        .unwrap();
        let receipt = registration_receipt(ok).unwrap();
        assert_eq!(receipt.driver.license_number, "LIC-001");
        assert_eq!(receipt.blockchain_tx, "0xbeef");
        assert!(receipt.explorer_url.is_none());

        let rejected: RegistrationResponse =
            serde_json::from_str(r#"{"success": false, "error": "license already registered"}"#)
                .unwrap();
        assert_eq!(
            registration_receipt(rejected).unwrap_err(),
            ApiError::Backend("license already registered".to_string())
        );
    }
}
