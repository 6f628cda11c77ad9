use leptos::*;

use crate::components::toast::{show_toast, ToastKind, ToastMessage};
use crate::config;
use crate::services::wallet::{network_name, WalletSession};
use crate::types::WalletSnapshot;

#[component]
pub fn Header(
    session: WalletSession,
    wallet: ReadSignal<WalletSnapshot>,
    set_toast: WriteSignal<Option<ToastMessage>>,
) -> impl IntoView {
    // Balance state
    let (balance, set_balance) = create_signal(None::<String>);

    // Refetch the balance whenever the session snapshot changes
    // (connect, resume, account or chain switch).
    let session_for_balance = session.clone();
    create_effect(move |_| {
        let snapshot = wallet.get();
        if !snapshot.connected {
            set_balance.set(None);
            return;
        }
        let session = session_for_balance.clone();
        spawn_local(async move {
            set_balance.set(Some(session.get_balance().await));
        });
    });

    // Handler pour connexion / déconnexion wallet
    let on_wallet_click = move |_| {
        if wallet.get().connected {
            session.disconnect();
            show_toast(set_toast, ToastKind::Success, "Wallet disconnected");
        } else {
            log::info!("🔑 Attempting to connect wallet...");
            let session = session.clone();
            spawn_local(async move {
                let snapshot = session.connect().await;
                if snapshot.demo {
                    show_toast(
                        set_toast,
                        ToastKind::Warning,
                        "Demo wallet generated (install MetaMask for real functionality)",
                    );
                } else {
                    show_toast(set_toast, ToastKind::Success, "Wallet connected successfully!");
                }
            });
        }
    };

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">{config::APP_NAME}</a>
                <span class="badge network-badge">
                    {move || match wallet.get().chain_id {
                        Some(chain_id) => network_name(&chain_id),
                        None => "Not connected".to_string(),
                    }}
                </span>
            </div>
            <div class="header-right">
                <span class="badge balance-badge">
                    {move || match balance.get() {
                        Some(balance) => format!("{balance} {}", config::NATIVE_SYMBOL),
                        None => format!("-- {}", config::NATIVE_SYMBOL),
                    }}
                </span>
                <div
                    class="wallet-status"
                    class:connected=move || wallet.get().connected
                    on:click=on_wallet_click
                    style="cursor: pointer;"
                >
                    <span class="wallet-dot" class:connected=move || wallet.get().connected></span>
                    <span>
                        {move || match wallet.get().address {
                            Some(address) => short_address(&address),
                            None => "Connect MetaMask".to_string(),
                        }}
                    </span>
                </div>
            </div>
        </header>
    }
}

/// `0x1234...abcd` style display form of an address.
fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
