//! Wedding Info Editor
//!
//! Admin form for the hero and contact details. Opens from the admin bar
//! and starts from the values currently shown.

use leptos::prelude::*;
use leptos::task::spawn_local;

use registry_core::InfoDraft;

use crate::context::use_app_context;
use crate::store::RegistryStateStoreFields;
use crate::sync::use_registry;

/// Single-line input bound to one field of the draft
fn text_field(
    label: &'static str,
    draft: RwSignal<InfoDraft>,
    get: fn(&InfoDraft) -> String,
    set: fn(&mut InfoDraft, String),
) -> impl IntoView {
    view! {
        <label class="field">
            <span class="field-label">{label}</span>
            <input
                class="input"
                prop:value=move || draft.with(get)
                on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
            />
        </label>
    }
}

#[component]
pub fn InfoEditor() -> impl IntoView {
    let ctx = use_app_context();
    let registry = use_registry();

    let draft = RwSignal::new(InfoDraft::default());
    let (saving, set_saving) = signal(false);

    // Reload the form each time the editor opens
    Effect::new(move |_| {
        if ctx.editing_info.get() {
            let info = registry.store.info().get_untracked();
            draft.set(InfoDraft::from(&info));
        }
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let pending = draft.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            match registry.update_info(pending).await {
                Ok(()) => {
                    ctx.set_editing_info(false);
                    ctx.success("Informações atualizadas!");
                }
                Err(e) => ctx.error(e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Show when=move || ctx.editing_info.get()>
            <form class="panel info-editor" on:submit=save>
                <div class="panel-header">
                    <h3>"Informações do Casamento"</h3>
                    <button type="button" class="icon-btn" on:click=move |_| ctx.set_editing_info(false)>"×"</button>
                </div>

                <div class="form-grid">
                    {text_field("Casal", draft, |d| d.couple.clone(), |d, v| d.couple = v)}
                    {text_field("Data", draft, |d| d.date.clone(), |d, v| d.date = v)}
                    {text_field("Telefone", draft, |d| d.phone.clone(), |d, v| d.phone = v)}
                    {text_field("E-mail", draft, |d| d.email.clone(), |d, v| d.email = v)}
                    {text_field("Endereço", draft, |d| d.address.clone(), |d, v| d.address = v)}
                    {text_field("Chave Pix", draft, |d| d.pix_key.clone(), |d, v| d.pix_key = v)}
                </div>
                <label class="field">
                    <span class="field-label">"Mensagem"</span>
                    <textarea
                        class="input"
                        rows="3"
                        prop:value=move || draft.read().message.clone()
                        on:input=move |ev| draft.update(|d| d.message = event_target_value(&ev))
                    ></textarea>
                </label>

                <div class="form-actions">
                    <button type="button" class="btn btn-outline" on:click=move |_| ctx.set_editing_info(false)>
                        "Cancelar"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Salvando..." } else { "Salvar" }}
                    </button>
                </div>
            </form>
        </Show>
    }
}
