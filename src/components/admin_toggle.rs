//! Admin Toggle Component
//!
//! Floating control in the corner: a lock that opens the login dialog for
//! visitors, and the admin badge with info-edit and logout for admins.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::Modal;
use crate::context::use_app_context;
use crate::sync::use_registry;

#[component]
pub fn AdminToggle() -> impl IntoView {
    let ctx = use_app_context();
    let registry = use_registry();

    let (show_dialog, set_show_dialog) = signal(false);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);

    let login = move || {
        if is_loading.get_untracked() {
            return;
        }
        set_is_loading.set(true);
        spawn_local(async move {
            let result = registry
                .login(email.get_untracked(), password.get_untracked())
                .await;
            set_is_loading.set(false);
            match result {
                Ok(()) => {
                    set_show_dialog.set(false);
                    set_email.set(String::new());
                    set_password.set(String::new());
                    ctx.success("Modo administrador ativado! ✨");
                }
                Err(e) => ctx.error(e),
            }
        });
    };

    let logout = move |_| {
        registry.logout();
        ctx.info("Você saiu do modo administrador.");
    };

    view! {
        <div class="admin-toggle">
            <Show
                when=move || registry.is_admin()
                fallback=move || view! {
                    <button class="round-btn" title="Acesso administrativo" on:click=move |_| set_show_dialog.set(true)>
                        "🔒"
                    </button>
                }
            >
                <span class="admin-badge">"⚙ Modo Admin"</span>
                <button class="round-btn" title="Editar informações" on:click=move |_| ctx.set_editing_info(true)>
                    "✎"
                </button>
                <button class="round-btn" title="Sair" on:click=logout>"⎋"</button>
            </Show>
        </div>

        <Modal
            open=show_dialog
            title="Acesso Administrativo".to_string()
            description="Faça login para gerenciar a lista de presentes."
            on_close=move |_| set_show_dialog.set(false)
        >
            <div class="modal-fields">
                <input
                    class="input"
                    type="email"
                    placeholder="E-mail"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    class="input"
                    type="password"
                    placeholder="Senha"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            login();
                        }
                    }
                />
            </div>
            <div class="modal-footer">
                <button class="btn btn-outline" on:click=move |_| set_show_dialog.set(false)>"Cancelar"</button>
                <button class="btn btn-primary" disabled=move || is_loading.get() on:click=move |_| login()>
                    {move || if is_loading.get() { "Entrando..." } else { "Entrar" }}
                </button>
            </div>
        </Modal>
    }
}
