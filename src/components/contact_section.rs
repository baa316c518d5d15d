//! Contact Section Component

use leptos::prelude::*;

use crate::store::RegistryStateStoreFields;
use crate::sync::use_registry;

/// Phone, e-mail and address cards plus the Pix key when one is set
#[component]
pub fn ContactSection() -> impl IntoView {
    let registry = use_registry();
    let info = move || registry.store.info().get();

    view! {
        <section class="contact-section">
            <div class="section-heading">
                <h2>"Nosso Contato"</h2>
                <p class="section-subtitle">"Entre em contato conosco para qualquer dúvida"</p>
            </div>

            <div class="contact-grid">
                <div class="contact-card">
                    <span class="contact-icon">"☎"</span>
                    <h3>"Telefone"</h3>
                    <p>{move || info().phone}</p>
                </div>
                <div class="contact-card">
                    <span class="contact-icon">"✉"</span>
                    <h3>"E-mail"</h3>
                    <p>{move || info().email}</p>
                </div>
                <div class="contact-card">
                    <span class="contact-icon">"⌂"</span>
                    <h3>"Endereço"</h3>
                    <p>{move || info().address}</p>
                </div>
            </div>

            {move || {
                info().pix_key().map(|key| {
                    view! {
                        <div class="contact-card pix-card">
                            <span class="contact-icon">"⚿"</span>
                            <h3>"Chave Pix"</h3>
                            <p class="pix-key">{key.to_string()}</p>
                            <p class="pix-note">"Para quem preferir presentear em dinheiro 💛"</p>
                        </div>
                    }
                })
            }}
        </section>
    }
}
