//! Driver registration tab.
//!
//! Requires a connected wallet; the session's address is attached to
//! the registration payload and the resulting transaction hash is
//! rendered with an explorer link.

use leptos::ev::SubmitEvent;
use leptos::*;

use crate::components::toast::{show_toast, ToastKind, ToastMessage};
use crate::config;
use crate::services::api::ApiClient;
use crate::types::{expiry_is_valid, RegistrationReceipt, RegistrationRequest, WalletSnapshot};

#[component]
pub fn RegisterTab(
    api: ApiClient,
    wallet: ReadSignal<WalletSnapshot>,
    set_toast: WriteSignal<Option<ToastMessage>>,
) -> impl IntoView {
    let (first_name, set_first_name) = create_signal(String::new());
    let (last_name, set_last_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (phone, set_phone) = create_signal(String::new());
    let (license_number, set_license_number) = create_signal(String::new());
    let (license_expiry, set_license_expiry) = create_signal(String::new());
    let (vehicle_plate, set_vehicle_plate) = create_signal(String::new());
    let (insurance_provider, set_insurance_provider) = create_signal(String::new());
    let (insurance_expiry, set_insurance_expiry) = create_signal(String::new());
    let (road_cert_number, set_road_cert_number) = create_signal(String::new());
    let (cert_expiry, set_cert_expiry) = create_signal(String::new());

    let (receipt, set_receipt) = create_signal(None::<RegistrationReceipt>);
    let (error, set_error) = create_signal(None::<String>);
    let (is_submitting, set_is_submitting) = create_signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let Some(wallet_address) = wallet.get().address else {
            show_toast(
                set_toast,
                ToastKind::Error,
                "Please connect your MetaMask wallet first",
            );
            return;
        };

        let registration = RegistrationRequest {
            first_name: first_name.get(),
            last_name: last_name.get(),
            email: email.get(),
            phone: phone.get(),
            license_number: license_number.get(),
            license_expiry: license_expiry.get(),
            vehicle_plate: vehicle_plate.get(),
            insurance_provider: insurance_provider.get(),
            insurance_expiry: insurance_expiry.get(),
            road_cert_number: road_cert_number.get(),
            cert_expiry: cert_expiry.get(),
            wallet_address,
        };

        // Flag documents that are already expired; the backend will
        // record them as invalid either way.
        let today = chrono::Local::now().date_naive();
        for (label, expiry) in [
            ("License", &registration.license_expiry),
            ("Insurance", &registration.insurance_expiry),
            ("Road worthiness", &registration.cert_expiry),
        ] {
            if !expiry.trim().is_empty() && !expiry_is_valid(expiry, today) {
                show_toast(
                    set_toast,
                    ToastKind::Warning,
                    &format!("{label} expiry date is already in the past"),
                );
            }
        }

        let api = api.clone();
        set_is_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api.register_driver(&registration).await {
                Ok(result) => {
                    set_receipt.set(Some(result));
                    show_toast(set_toast, ToastKind::Success, "Registration successful!");

                    // Réinitialiser le formulaire
                    set_first_name.set(String::new());
                    set_last_name.set(String::new());
                    set_email.set(String::new());
                    set_phone.set(String::new());
                    set_license_number.set(String::new());
                    set_license_expiry.set(String::new());
                    set_vehicle_plate.set(String::new());
                    set_insurance_provider.set(String::new());
                    set_insurance_expiry.set(String::new());
                    set_road_cert_number.set(String::new());
                    set_cert_expiry.set(String::new());
                }
                Err(e) => {
                    log::error!("Registration error: {e}");
                    set_error.set(Some(e.to_string()));
                    show_toast(set_toast, ToastKind::Error, "Registration failed");
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="panel register-panel">
            <form on:submit=on_submit>
                <div class="form-grid">
                    {field("First Name", "text", first_name, set_first_name)}
                    {field("Last Name", "text", last_name, set_last_name)}
                    {field("Email", "email", email, set_email)}
                    {field("Phone", "tel", phone, set_phone)}
                    {field("License Number", "text", license_number, set_license_number)}
                    {field("License Expiry", "date", license_expiry, set_license_expiry)}
                    {field("Vehicle Plate", "text", vehicle_plate, set_vehicle_plate)}
                    {field("Insurance Provider", "text", insurance_provider, set_insurance_provider)}
                    {field("Insurance Expiry", "date", insurance_expiry, set_insurance_expiry)}
                    {field("Road Cert Number", "text", road_cert_number, set_road_cert_number)}
                    {field("Road Cert Expiry", "date", cert_expiry, set_cert_expiry)}

                    <div class="form-field">
                        <label>"Wallet Address"</label>
                        <input
                            type="text"
                            readonly=true
                            placeholder="Connect wallet to fill"
                            prop:value=move || wallet.get().address.unwrap_or_default()
                        />
                    </div>
                </div>

                <button type="submit" class="primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Registering..." } else { "Register Driver" }}
                </button>

                <p class="faucet-hint">
                    "Need test MATIC? "
                    <a href=config::FAUCET_URL target="_blank">"Polygon Faucet"</a>
                </p>
            </form>

            {move || {
                receipt
                    .get()
                    .map(|receipt| {
                        view! {
                            <div class="alert alert-success">
                                <h3>"✅ Registration Successful!"</h3>
                                <p>
                                    "Your driver profile has been registered on the Polygon Mumbai blockchain."
                                </p>
                                <div class="tx-hash">
                                    <strong>"🔗 Transaction Hash: "</strong>
                                    <code>{receipt.blockchain_tx.clone()}</code>
                                </div>
                                <p><strong>"License Number: "</strong> {receipt.driver.license_number.clone()}</p>
                                <p>
                                    <strong>"Name: "</strong>
                                    {format!("{} {}", receipt.driver.first_name, receipt.driver.last_name)}
                                </p>
                                <p><strong>"Wallet: "</strong> {receipt.driver.wallet_address.clone()}</p>
                                {receipt
                                    .explorer_url
                                    .clone()
                                    .map(|url| {
                                        view! {
                                            <a href=url target="_blank" class="explorer-link">
                                                "🔍 View on PolygonScan →"
                                            </a>
                                        }
                                    })}
                            </div>
                        }
                    })
            }}

            {move || {
                error
                    .get()
                    .map(|message| {
                        view! {
                            <div class="alert alert-danger">
                                <h3>"❌ Registration Failed"</h3>
                                <p>{message}</p>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

fn field(
    label: &'static str,
    input_type: &'static str,
    value: ReadSignal<String>,
    setter: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-field">
            <label>{label}</label>
            <input
                type=input_type
                required=true
                prop:value=value
                on:input=move |ev| setter.set(event_target_value(&ev))
            />
        </div>
    }
}
