//! Driver verification tab.
//!
//! Full verification by license number, a lightweight validity-only
//! check, and verification by the connected wallet address.

use leptos::*;

use crate::components::toast::{show_toast, ToastKind, ToastMessage};
use crate::services::api::ApiClient;
use crate::types::{DocumentValidity, VerificationReport, WalletSnapshot};

#[component]
pub fn VerifyTab(
    api: ApiClient,
    wallet: ReadSignal<WalletSnapshot>,
    set_toast: WriteSignal<Option<ToastMessage>>,
) -> impl IntoView {
    let (license, set_license) = create_signal(String::new());
    let (report, set_report) = create_signal(None::<VerificationReport>);
    let (validity, set_validity) = create_signal(None::<DocumentValidity>);
    let (error, set_error) = create_signal(None::<String>);
    let (is_loading, set_is_loading) = create_signal(false);

    let api_verify = api.clone();
    let on_verify = move |_| {
        let license_number = license.get().trim().to_string();
        if license_number.is_empty() {
            show_toast(set_toast, ToastKind::Error, "Please enter a license number");
            return;
        }

        let api = api_verify.clone();
        set_is_loading.set(true);
        set_report.set(None);
        set_validity.set(None);
        set_error.set(None);
        spawn_local(async move {
            match api.verify_driver(&license_number).await {
                Ok(result) => {
                    set_report.set(Some(result));
                    show_toast(set_toast, ToastKind::Success, "Driver verified successfully!");
                }
                Err(e) => {
                    log::error!("Verification error: {e}");
                    set_error.set(Some(e.to_string()));
                    show_toast(set_toast, ToastKind::Error, "Verification failed");
                }
            }
            set_is_loading.set(false);
        });
    };

    let api_validity = api.clone();
    let on_check_validity = move |_| {
        let license_number = license.get().trim().to_string();
        if license_number.is_empty() {
            show_toast(set_toast, ToastKind::Error, "Please enter a license number");
            return;
        }

        let api = api_validity.clone();
        set_validity.set(None);
        spawn_local(async move {
            match api.check_document_validity(&license_number).await {
                Ok(flags) => set_validity.set(Some(flags)),
                Err(e) => {
                    log::error!("Validity check error: {e}");
                    show_toast(set_toast, ToastKind::Error, &format!("Validity check failed: {e}"));
                }
            }
        });
    };

    let on_verify_wallet = move |_| {
        let Some(address) = wallet.get().address else {
            show_toast(set_toast, ToastKind::Error, "Please connect your wallet first");
            return;
        };

        let api = api.clone();
        set_is_loading.set(true);
        set_report.set(None);
        set_error.set(None);
        spawn_local(async move {
            match api.verify_by_wallet(&address).await {
                Ok(result) => {
                    set_report.set(Some(result));
                    show_toast(set_toast, ToastKind::Success, "Driver verified successfully!");
                }
                Err(e) => {
                    log::error!("Wallet verification error: {e}");
                    set_error.set(Some(e.to_string()));
                    show_toast(set_toast, ToastKind::Error, "Verification failed");
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="panel verify-panel">
            <div class="form-row">
                <input
                    type="text"
                    placeholder="License number, e.g. LIC-001"
                    prop:value=license
                    on:input=move |ev| set_license.set(event_target_value(&ev))
                />
                <button class="primary" on:click=on_verify disabled=move || is_loading.get()>
                    {move || if is_loading.get() { "Verifying..." } else { "Verify Driver" }}
                </button>
                <button class="secondary" on:click=on_check_validity>
                    "Check Validity Only"
                </button>
                <Show when=move || wallet.get().connected fallback=|| view! {}>
                    <button class="secondary" on:click=on_verify_wallet.clone()>
                        "Verify My Wallet"
                    </button>
                </Show>
            </div>

            {move || {
                validity
                    .get()
                    .map(|flags| {
                        view! {
                            <div class="validity-summary">
                                <p>"License: " {status_text(flags.license_valid)}</p>
                                <p>"Insurance: " {status_text(flags.insurance_valid)}</p>
                                <p>"Road worthiness: " {status_text(flags.road_worthiness_valid)}</p>
                                <p class="overall">
                                    {if flags.all_documents_valid {
                                        "✅ ALL VALID"
                                    } else {
                                        "⚠️ SOME EXPIRED"
                                    }}
                                </p>
                            </div>
                        }
                    })
            }}

            {move || report.get().map(|report| verification_card(&report))}

            {move || {
                error
                    .get()
                    .map(|message| {
                        view! {
                            <div class="alert alert-danger">
                                <h3>"❌ Verification Failed"</h3>
                                <p>{message}</p>
                                <p class="hint">
                                    "This driver may not be registered in the system yet."
                                </p>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

fn verification_card(report: &VerificationReport) -> impl IntoView {
    let driver = &report.driver_info;
    let chain = &report.blockchain_info;

    view! {
        <div class="verification-card">
            <div class="verification-header">
                <h3>"✅ Verification Successful"</h3>
            </div>

            <div class="verification-grid">
                {grid_item("Full Name", driver.full_name.clone())}
                {grid_item("License Number", driver.license_number.clone())}
                {grid_item("License Expiry", driver.license_expiry.clone())}
                {grid_item("License Status", status_text(driver.license_valid).to_string())}
                {grid_item("Insurance Provider", driver.insurance_number.clone())}
                {grid_item("Insurance Expiry", driver.insurance_expiry.clone())}
                {grid_item("Insurance Status", status_text(driver.insurance_valid).to_string())}
                {grid_item("Vehicle Number", driver.vehicle_number.clone())}
                {grid_item("Road Worthiness", driver.road_worthiness.clone())}
                {grid_item("RW Expiry", driver.road_worthiness_expiry.clone())}
                {grid_item("RW Status", status_text(driver.road_worthiness_valid).to_string())}
                {grid_item(
                    "Overall Status",
                    if driver.all_documents_valid { "✅ ALL VALID" } else { "⚠️ SOME EXPIRED" }
                        .to_string(),
                )}
            </div>

            <div class="blockchain-hash">
                <label>"🔗 Blockchain Transaction Hash (Polygon Mumbai)"</label>
                <code>{chain.blockchain_hash.clone()}</code>
            </div>

            <div class="attestation-meta">
                <p>
                    {if chain.verified_on_chain {
                        "✅ Verified on Polygon Mumbai Testnet"
                    } else {
                        "⚠️ Not yet verified on chain"
                    }}
                </p>
                <p>"Wallet: " {chain.wallet_address.clone()}</p>
                {chain
                    .explorer_url
                    .clone()
                    .map(|url| view! { <a href=url target="_blank">"View on PolygonScan →"</a> })}
            </div>
        </div>
    }
}

fn grid_item(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="verification-item">
            <label>{label}</label>
            <div class="value">{value}</div>
        </div>
    }
}

fn status_text(valid: bool) -> &'static str {
    if valid {
        "✅ Valid"
    } else {
        "❌ Expired"
    }
}
