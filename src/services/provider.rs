//! Injected wallet provider (MetaMask and compatible extensions).
//!
//! The browser wallet exposes a single duck-typed `window.ethereum`
//! object with a `request({method, params})` entry point and an
//! `on(event, handler)` subscription surface. This module wraps it in a
//! capability handle so the rest of the app never touches the global:
//! the [`WalletProvider`] variant is chosen once at session
//! construction and carried from there.

use serde_json::{json, Value};
use std::fmt;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::types::NetworkDescriptor;

/// User declined the request in the wallet popup.
pub const CODE_USER_REJECTED: i32 = 4001;

/// The wallet does not know the requested chain yet.
pub const CODE_UNRECOGNIZED_CHAIN: i32 = 4902;

/// Error reported by the wallet provider.
///
/// Keeps the provider's numeric code when one was present so callers
/// can branch on rejection vs. unknown-chain without string matching.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderError {
    pub code: Option<i32>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(CODE_USER_REJECTED)
    }

    pub fn is_unknown_chain(&self) -> bool {
        self.code == Some(CODE_UNRECOGNIZED_CHAIN)
    }

    fn from_js(value: JsValue) -> Self {
        let code = js_sys::Reflect::get(&value, &JsValue::from_str("code"))
            .ok()
            .and_then(|v| v.as_f64())
            .map(|c| c as i32);
        let message = js_sys::Reflect::get(&value, &JsValue::from_str("message"))
            .ok()
            .and_then(|v| v.as_string())
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self { code, message }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {}

/// Wallet capability available to the session.
pub enum WalletProvider {
    /// A browser extension injected a provider object into the page.
    Injected(InjectedProvider),
    /// No extension present; the session falls back to a demo identity.
    Absent,
}

impl WalletProvider {
    /// Look for an injected provider on the current page.
    pub fn detect() -> Self {
        match InjectedProvider::from_window() {
            Some(provider) => {
                log::info!("🦊 Wallet extension detected");
                WalletProvider::Injected(provider)
            }
            None => {
                log::warn!("⚠️  No wallet extension found");
                WalletProvider::Absent
            }
        }
    }

    pub fn injected(&self) -> Option<&InjectedProvider> {
        match self {
            WalletProvider::Injected(provider) => Some(provider),
            WalletProvider::Absent => None,
        }
    }

    pub fn is_injected(&self) -> bool {
        self.injected().is_some()
    }
}

/// Handle on the page's injected EIP-1193 provider object.
#[derive(Clone)]
pub struct InjectedProvider {
    raw: JsValue,
}

impl InjectedProvider {
    fn from_window() -> Option<Self> {
        let window: JsValue = web_sys::window()?.into();
        let raw = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if raw.is_null() || raw.is_undefined() {
            return None;
        }
        Some(Self { raw })
    }

    /// Prompt the user for account access.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.string_list("eth_requestAccounts").await
    }

    /// Accounts already authorized for this origin, without a prompt.
    pub async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.string_list("eth_accounts").await
    }

    /// Current chain id, as a 0x-prefixed hex string.
    pub async fn chain_id(&self) -> Result<String, ProviderError> {
        match self.request("eth_chainId", json!([])).await? {
            Value::String(id) => Ok(id),
            Value::Number(id) => Ok(format!("0x{:x}", id.as_u64().unwrap_or(0))),
            other => Err(ProviderError::new(format!(
                "eth_chainId returned unexpected value: {other}"
            ))),
        }
    }

    pub async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        self.request("wallet_switchEthereumChain", json!([{ "chainId": chain_id }]))
            .await
            .map(|_| ())
    }

    pub async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderError> {
        let descriptor = serde_json::to_value(network)
            .map_err(|e| ProviderError::new(format!("failed to encode network descriptor: {e}")))?;
        self.request("wallet_addEthereumChain", json!([descriptor]))
            .await
            .map(|_| ())
    }

    /// Raw balance of `address` in the smallest unit, hex-encoded.
    pub async fn get_balance(&self, address: &str) -> Result<String, ProviderError> {
        match self.request("eth_getBalance", json!([address, "latest"])).await? {
            Value::String(raw) => Ok(raw),
            other => Err(ProviderError::new(format!(
                "eth_getBalance returned unexpected value: {other}"
            ))),
        }
    }

    pub async fn personal_sign(
        &self,
        message: &str,
        address: &str,
    ) -> Result<String, ProviderError> {
        match self.request("personal_sign", json!([message, address])).await? {
            Value::String(signature) => Ok(signature),
            other => Err(ProviderError::new(format!(
                "personal_sign returned unexpected value: {other}"
            ))),
        }
    }

    pub fn on_accounts_changed(&self, mut handler: impl FnMut(Vec<String>) + 'static) {
        self.subscribe("accountsChanged", move |value| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(address) = item.as_string() {
                        accounts.push(address);
                    }
                }
            }
            handler(accounts);
        });
    }

    pub fn on_chain_changed(&self, mut handler: impl FnMut(String) + 'static) {
        self.subscribe("chainChanged", move |value| {
            if let Some(chain_id) = value.as_string() {
                handler(chain_id);
            }
        });
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request_fn = js_sys::Reflect::get(&self.raw, &JsValue::from_str("request"))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| ProviderError::new("provider does not expose request()"))?;

        let payload = json!({ "method": method, "params": params });
        let payload_js = serde_wasm_bindgen::to_value(&payload)
            .map_err(|e| ProviderError::new(format!("failed to encode {method} request: {e}")))?;

        let promise = request_fn
            .call1(&self.raw, &payload_js)
            .map_err(ProviderError::from_js)?;
        let promise: js_sys::Promise = promise
            .dyn_into()
            .map_err(|_| ProviderError::new(format!("{method} did not return a promise")))?;

        let result = JsFuture::from(promise).await.map_err(ProviderError::from_js)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ProviderError::new(format!("failed to decode {method} response: {e}")))
    }

    async fn string_list(&self, method: &str) -> Result<Vec<String>, ProviderError> {
        let value = self.request(method, json!([])).await?;
        let items = value
            .as_array()
            .ok_or_else(|| ProviderError::new(format!("{method} must return an array")))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ProviderError::new(format!("{method} item is not a string")))
            })
            .collect()
    }

    fn subscribe(&self, event: &str, handler: impl FnMut(JsValue) + 'static) {
        let on_fn = js_sys::Reflect::get(&self.raw, &JsValue::from_str("on"))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok());
        let Some(on_fn) = on_fn else {
            log::warn!("provider does not expose on(); {event} updates unavailable");
            return;
        };

        let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
        if let Err(e) = on_fn.call2(
            &self.raw,
            &JsValue::from_str(event),
            closure.as_ref().unchecked_ref(),
        ) {
            log::warn!("failed to subscribe to {event}: {e:?}");
        }
        // The subscription lives for the whole page session.
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_and_unknown_chain_codes_are_distinguished() {
        let rejected = ProviderError {
            code: Some(CODE_USER_REJECTED),
            message: "User rejected the request.".to_string(),
        };
        assert!(rejected.is_user_rejection());
        assert!(!rejected.is_unknown_chain());

        let unknown = ProviderError {
            code: Some(CODE_UNRECOGNIZED_CHAIN),
            message: "Unrecognized chain ID".to_string(),
        };
        assert!(unknown.is_unknown_chain());

        assert!(!ProviderError::new("boom").is_user_rejection());
    }

    #[test]
    fn display_appends_code_when_present() {
        let err = ProviderError {
            code: Some(CODE_USER_REJECTED),
            message: "User rejected the request.".to_string(),
        };
        assert_eq!(err.to_string(), "User rejected the request. (code 4001)");
        assert_eq!(ProviderError::new("boom").to_string(), "boom");
    }
}
