//! Wedding Registry App
//!
//! Single page: hero, admin tools, gift list, contact details and footer.

use leptos::prelude::*;

use crate::components::{AddGiftForm, AdminToggle, ContactSection, GiftList, HeroSection, InfoEditor, ToastHost};
use crate::config::RuntimeConfig;
use crate::context::AppContext;
use crate::models::Toast;
use crate::store::RegistryStateStoreFields;
use crate::sync::use_wedding_data;

#[component]
pub fn App(config: RuntimeConfig) -> impl IntoView {
    let ctx = AppContext::new(signal(Vec::<Toast>::new()), signal(false));
    provide_context(ctx);

    let page = match config.supabase() {
        Ok(supabase) => view! { <RegistryPage config=supabase ctx=ctx /> }.into_any(),
        Err(e) => {
            log::error!("backend not configured: {}", e);
            view! { <ConfigErrorPanel message=e.to_string() /> }.into_any()
        }
    };

    view! {
        {page}
        <ToastHost />
    }
}

#[component]
fn RegistryPage(config: registry_core::SupabaseConfig, ctx: AppContext) -> impl IntoView {
    let registry = use_wedding_data(config, ctx);

    view! {
        <div class="page">
            <HeroSection />

            <main class="registry">
                <Show when=move || registry.is_admin()>
                    <div class="admin-area">
                        <AddGiftForm />
                        <InfoEditor />
                    </div>
                </Show>

                <GiftList />
            </main>

            <ContactSection />

            <footer class="footer">
                <p>
                    "Feito com " <span class="heart">"♥"</span> " para "
                    {move || registry.store.info().read().couple.clone()}
                </p>
                <Show when=move || !registry.store.live().get()>
                    <p class="footer-offline">"Atualizações em tempo real indisponíveis"</p>
                </Show>
            </footer>

            <AdminToggle />
        </div>
    }
}

/// Shown instead of the page when the backend URL or key is missing
#[component]
fn ConfigErrorPanel(message: String) -> impl IntoView {
    // Startup log, so a misconfigured deploy can be diagnosed from the page
    let log_lines = rolling_logger::recent()
        .iter()
        .map(|entry| entry.render())
        .collect::<Vec<_>>()
        .join("\n");

    view! {
        <div class="config-error">
            <h1>"Lista de Presentes"</h1>
            <p>"O site não está configurado corretamente."</p>
            <code>{message}</code>
            <pre class="config-log">{log_lines}</pre>
        </div>
    }
}
