//! Wallet session: connection, network negotiation and session queries.
//!
//! The session owns the wallet lifecycle state and is the only writer
//! to it. Transitions come from two asynchronous entry points (the
//! explicit [`WalletSession::connect`] flow and provider-pushed
//! account/chain events) and each one is applied in a single mutation
//! scope, so an in-flight connect can never observe a half-applied
//! event. Subscribers get a [`WalletSnapshot`] after every transition.
//!
//! When no usable provider is available (absent extension, user
//! rejection, any provider error mid-connect) the session synthesizes a
//! placeholder address and connects in demo mode so downstream
//! registration flows stay usable.

use rand::Rng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config;
use crate::services::provider::{InjectedProvider, ProviderError, WalletProvider};
use crate::types::{NetworkDescriptor, WalletSnapshot, WalletState};

type ChangeListener = Box<dyn Fn(WalletSnapshot)>;

struct SessionShared {
    state: RefCell<WalletState>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl SessionShared {
    fn transition(&self, next: WalletState) {
        *self.state.borrow_mut() = next;
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.state.borrow().snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(snapshot.clone());
        }
    }

    fn apply_accounts_changed(&self, accounts: Vec<String>) {
        match accounts.into_iter().next() {
            None => {
                log::info!("👛 Wallet access revoked, disconnecting");
                self.transition(WalletState::Disconnected);
            }
            Some(address) => {
                let next = match &*self.state.borrow() {
                    WalletState::Connected { chain_id, demo, .. } => Some(WalletState::Connected {
                        address,
                        chain_id: chain_id.clone(),
                        demo: *demo,
                    }),
                    _ => None,
                };
                if let Some(next) = next {
                    log::info!("👛 Active account changed");
                    self.transition(next);
                }
            }
        }
    }

    fn apply_chain_changed(&self, chain_id: String) {
        // The network match is not re-validated here; the next explicit
        // action sees the new chain.
        let next = match &*self.state.borrow() {
            WalletState::Connected { address, demo, .. } => Some(WalletState::Connected {
                address: address.clone(),
                chain_id: Some(chain_id.clone()),
                demo: *demo,
            }),
            _ => None,
        };
        if let Some(next) = next {
            log::info!("⛓️  Chain changed to {chain_id}");
            self.transition(next);
        }
    }
}

/// Wallet connection manager.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct WalletSession {
    provider: Rc<WalletProvider>,
    shared: Rc<SessionShared>,
    hooks_registered: Rc<Cell<bool>>,
    target: Rc<NetworkDescriptor>,
}

impl WalletSession {
    /// Build a session against whatever provider the page offers.
    pub fn detect() -> Self {
        Self::with_provider(WalletProvider::detect())
    }

    pub fn with_provider(provider: WalletProvider) -> Self {
        Self {
            provider: Rc::new(provider),
            shared: Rc::new(SessionShared {
                state: RefCell::new(WalletState::Disconnected),
                listeners: RefCell::new(Vec::new()),
            }),
            hooks_registered: Rc::new(Cell::new(false)),
            target: Rc::new(config::target_network()),
        }
    }

    /// Register a listener invoked after every state transition.
    pub fn subscribe(&self, listener: impl Fn(WalletSnapshot) + 'static) {
        self.shared.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Connect the wallet. Never fails: when the provider is absent,
    /// the user rejects, or any provider call errors out, the session
    /// falls back to a locally synthesized demo identity.
    pub async fn connect(&self) -> WalletSnapshot {
        self.shared.transition(WalletState::Connecting);

        let Some(provider) = self.provider.injected() else {
            log::warn!("⚠️  No wallet extension, generating demo wallet");
            return self.fall_back_to_demo();
        };

        match self.connect_injected(provider).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_user_rejection() => {
                log::error!("❌ Connection rejected by user");
                self.fall_back_to_demo()
            }
            Err(e) => {
                log::error!("❌ Wallet connection failed: {e}");
                self.fall_back_to_demo()
            }
        }
    }

    async fn connect_injected(
        &self,
        provider: &InjectedProvider,
    ) -> Result<WalletSnapshot, ProviderError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new("provider returned no accounts"))?;

        let mut chain_id = provider.chain_id().await?;
        log::info!("🔌 Connected to chain {chain_id}");

        if chain_id != self.target.chain_id {
            if self.switch_network(provider).await {
                chain_id = self.target.chain_id.clone();
            } else {
                log::warn!(
                    "⚠️  Please switch to {} manually",
                    self.target.chain_name
                );
            }
        }

        self.register_provider_hooks(provider);
        self.shared.transition(WalletState::Connected {
            address: address.clone(),
            chain_id: Some(chain_id),
            demo: false,
        });
        log::info!("✅ Wallet connected: {address}");
        Ok(self.snapshot())
    }

    /// Steer the provider onto the target network. Tries a plain
    /// switch first, then an add-chain with the full descriptor when
    /// the wallet does not know the chain yet. Failure is non-fatal to
    /// the connection.
    async fn switch_network(&self, provider: &InjectedProvider) -> bool {
        match provider.switch_chain(&self.target.chain_id).await {
            Ok(()) => {
                log::info!("✅ Switched to {}", self.target.chain_name);
                true
            }
            Err(e) if e.is_unknown_chain() => {
                match provider.add_chain(&self.target).await {
                    Ok(()) => {
                        log::info!("✅ {} added to wallet", self.target.chain_name);
                        true
                    }
                    Err(add_err) => {
                        log::error!("Failed to add network: {add_err}");
                        false
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to switch network: {e}");
                false
            }
        }
    }

    fn register_provider_hooks(&self, provider: &InjectedProvider) {
        if self.hooks_registered.replace(true) {
            return;
        }
        let shared = Rc::clone(&self.shared);
        provider.on_accounts_changed(move |accounts| shared.apply_accounts_changed(accounts));
        let shared = Rc::clone(&self.shared);
        provider.on_chain_changed(move |chain_id| shared.apply_chain_changed(chain_id));
    }

    fn fall_back_to_demo(&self) -> WalletSnapshot {
        self.shared.transition(WalletState::Connected {
            address: demo_wallet_address(),
            chain_id: None,
            demo: true,
        });
        log::info!("🎭 Demo wallet generated (install MetaMask for real functionality)");
        self.snapshot()
    }

    /// Silently resume when the wallet already authorized this origin.
    pub async fn resume_if_authorized(&self) -> Option<WalletSnapshot> {
        let provider = self.provider.injected()?;
        match provider.authorized_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                log::info!("🔁 Resuming previously connected wallet...");
                Some(self.connect().await)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Wallet resume check failed: {e}");
                None
            }
        }
    }

    /// Explicit disconnect, from any state.
    pub fn disconnect(&self) {
        self.shared.transition(WalletState::Disconnected);
        log::info!("👋 Wallet disconnected");
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        self.shared.state.borrow().snapshot()
    }

    pub fn address(&self) -> Option<String> {
        self.shared.state.borrow().address().map(str::to_string)
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.borrow().is_connected()
    }

    pub fn is_on_target_network(&self) -> bool {
        self.shared.state.borrow().chain_id() == Some(self.target.chain_id.as_str())
    }

    /// Balance of the connected account, formatted for display.
    /// Returns `"0"` on any failure or when not connected.
    pub async fn get_balance(&self) -> String {
        let snapshot = self.snapshot();
        let (Some(address), Some(provider)) = (snapshot.address, self.provider.injected()) else {
            return "0".to_string();
        };

        match provider.get_balance(&address).await {
            Ok(raw) => format_native_balance(&raw).unwrap_or_else(|| "0".to_string()),
            Err(e) => {
                log::error!("Balance fetch error: {e}");
                "0".to_string()
            }
        }
    }

    /// Sign a message with the connected account.
    pub async fn sign_message(&self, message: &str) -> Result<String, ProviderError> {
        let address = self
            .address()
            .ok_or_else(|| ProviderError::new("Wallet not connected"))?;
        let provider = self
            .provider
            .injected()
            .ok_or_else(|| ProviderError::new("Wallet not connected"))?;
        provider.personal_sign(message, &address).await
    }

    /// Display name of the session's current network.
    pub fn network_name(&self) -> String {
        match self.shared.state.borrow().chain_id() {
            Some(chain_id) => network_name(chain_id),
            None => "Not connected".to_string(),
        }
    }
}

/// Display name for a chain id, from a fixed table of known networks.
pub fn network_name(chain_id: &str) -> String {
    match chain_id {
        "0x1" => "Ethereum Mainnet".to_string(),
        "0x89" => "Polygon Mainnet".to_string(),
        "0x13881" => "Polygon Mumbai Testnet".to_string(),
        "0xaa36a7" => "Sepolia Testnet".to_string(),
        "0x5" => "Goerli Testnet".to_string(),
        other => format!("Unknown ({other})"),
    }
}

/// Placeholder address for demo sessions: 0x followed by 40 hex chars.
fn demo_wallet_address() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes[..]);
    format!("0x{}", hex::encode(bytes))
}

/// Convert a hex-encoded smallest-unit balance into display units with
/// four decimal places. `None` when the input is not parseable.
fn format_native_balance(raw_hex: &str) -> Option<String> {
    let digits = raw_hex
        .strip_prefix("0x")
        .or_else(|| raw_hex.strip_prefix("0X"))
        .unwrap_or(raw_hex);
    let smallest_units = u128::from_str_radix(digits, 16).ok()?;
    let native = smallest_units as f64 / 10f64.powi(config::NATIVE_DECIMALS as i32);
    Some(format!("{native:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    // The Absent-provider paths never await anything, so a single poll
    // is enough to drive them to completion.
    fn poll_ready<F: Future>(future: F) -> F::Output {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

        let waker = unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) };
        let mut future = Box::pin(future);
        match future.as_mut().poll(&mut Context::from_waker(&waker)) {
            Poll::Ready(output) => output,
            Poll::Pending => panic!("future did not complete synchronously"),
        }
    }

    fn demo_session() -> WalletSession {
        WalletSession::with_provider(WalletProvider::Absent)
    }

    #[test]
    fn connect_without_provider_yields_demo_wallet() {
        let session = demo_session();
        let snapshot = poll_ready(session.connect());

        assert!(snapshot.connected);
        assert!(snapshot.demo);
        let address = snapshot.address.expect("demo wallet has an address");
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert!(session.is_connected());
    }

    #[test]
    fn demo_addresses_are_not_constant() {
        assert_ne!(demo_wallet_address(), demo_wallet_address());
    }

    #[test]
    fn accounts_changed_with_empty_list_disconnects() {
        let session = demo_session();
        poll_ready(session.connect());
        assert!(session.is_connected());

        session.shared.apply_accounts_changed(Vec::new());
        assert!(!session.is_connected());
        assert_eq!(session.address(), None);
    }

    #[test]
    fn accounts_changed_with_new_address_updates_in_place() {
        let session = demo_session();
        poll_ready(session.connect());

        session
            .shared
            .apply_accounts_changed(vec!["0xabcdef".to_string()]);
        assert!(session.is_connected());
        assert_eq!(session.address().as_deref(), Some("0xabcdef"));
    }

    #[test]
    fn accounts_changed_is_ignored_when_disconnected() {
        let session = demo_session();
        session
            .shared
            .apply_accounts_changed(vec!["0xabcdef".to_string()]);
        assert!(!session.is_connected());
    }

    #[test]
    fn chain_changed_updates_chain_only() {
        let session = demo_session();
        poll_ready(session.connect());
        let address = session.address();

        session.shared.apply_chain_changed("0x89".to_string());
        assert_eq!(session.address(), address);
        assert_eq!(session.network_name(), "Polygon Mainnet");
        assert!(!session.is_on_target_network());

        session.shared.apply_chain_changed("0x13881".to_string());
        assert!(session.is_on_target_network());
    }

    #[test]
    fn subscribers_see_every_transition() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let session = demo_session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |snapshot| sink.borrow_mut().push(snapshot));

        poll_ready(session.connect());
        session.disconnect();

        let seen = seen.borrow();
        // Connecting, Connected(demo), Disconnected.
        assert_eq!(seen.len(), 3);
        assert!(!seen[0].connected);
        assert!(seen[1].connected && seen[1].demo);
        assert!(!seen[2].connected);
    }

    #[test]
    fn disconnect_from_any_state_is_disconnected() {
        let session = demo_session();
        session.disconnect();
        assert!(!session.is_connected());
        assert_eq!(session.network_name(), "Not connected");
    }

    #[test]
    fn balance_is_zero_when_not_connected() {
        let session = demo_session();
        assert_eq!(poll_ready(session.get_balance()), "0");
    }

    #[test]
    fn balance_is_zero_for_demo_wallets() {
        let session = demo_session();
        poll_ready(session.connect());
        // Demo sessions have no provider to query.
        assert_eq!(poll_ready(session.get_balance()), "0");
    }

    #[test]
    fn sign_message_requires_connection() {
        let session = demo_session();
        let err = poll_ready(session.sign_message("hello")).unwrap_err();
        assert_eq!(err.message, "Wallet not connected");
    }

    #[test]
    fn resume_without_provider_is_a_no_op() {
        let session = demo_session();
        assert!(poll_ready(session.resume_if_authorized()).is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn network_name_table() {
        assert_eq!(network_name("0x13881"), "Polygon Mumbai Testnet");
        assert_eq!(network_name("0x1"), "Ethereum Mainnet");
        assert_eq!(network_name("0xdead"), "Unknown (0xdead)");
    }

    #[test]
    fn balance_formatting_uses_four_decimals() {
        // 1 MATIC in wei.
        assert_eq!(
            format_native_balance("0xde0b6b3a7640000").as_deref(),
            Some("1.0000")
        );
        // 0.5 MATIC.
        assert_eq!(
            format_native_balance("0x6f05b59d3b20000").as_deref(),
            Some("0.5000")
        );
        assert_eq!(format_native_balance("0x0").as_deref(), Some("0.0000"));
        assert_eq!(format_native_balance("not-hex"), None);
    }
}
