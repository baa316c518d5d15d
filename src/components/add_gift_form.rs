//! Add Gift Form Component
//!
//! Collapsible admin form for new gifts.

use leptos::prelude::*;
use leptos::task::spawn_local;

use registry_core::GiftDraft;

use crate::context::use_app_context;
use crate::sync::use_registry;

#[component]
pub fn AddGiftForm() -> impl IntoView {
    let ctx = use_app_context();
    let registry = use_registry();

    let (is_open, set_is_open) = signal(false);
    let (saving, set_saving) = signal(false);
    let draft = RwSignal::new(GiftDraft::default());

    let close = move || {
        draft.set(GiftDraft::default());
        set_is_open.set(false);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let pending = draft.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            match registry.add_gift(pending).await {
                Ok(_) => {
                    close();
                    ctx.success("Presente adicionado! 🎁");
                }
                Err(e) => ctx.error(e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="add-gift">
            <Show
                when=move || is_open.get()
                fallback=move || view! {
                    <div class="add-gift-trigger">
                        <button class="btn btn-gold" on:click=move |_| set_is_open.set(true)>
                            "+ Adicionar Presente"
                        </button>
                    </div>
                }
            >
                <form class="panel add-gift-form" on:submit=submit>
                    <div class="panel-header">
                        <h3>"Novo Presente"</h3>
                        <button type="button" class="icon-btn" on:click=move |_| close()>"×"</button>
                    </div>

                    <input
                        class="input"
                        placeholder="Nome do presente *"
                        prop:value=move || draft.read().name.clone()
                        on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                    />
                    <textarea
                        class="input"
                        rows="2"
                        placeholder="Descrição (opcional)"
                        prop:value=move || draft.read().description.clone()
                        on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                    ></textarea>
                    <div class="form-grid">
                        <input
                            class="input"
                            inputmode="decimal"
                            placeholder="Preço (R$)"
                            prop:value=move || draft.read().price.clone()
                            on:input=move |ev| draft.update(|d| d.price = event_target_value(&ev))
                        />
                        <input
                            class="input"
                            placeholder="Link do produto"
                            prop:value=move || draft.read().link.clone()
                            on:input=move |ev| draft.update(|d| d.link = event_target_value(&ev))
                        />
                    </div>
                    <input
                        class="input"
                        placeholder="URL da imagem (opcional)"
                        prop:value=move || draft.read().image.clone()
                        on:input=move |ev| draft.update(|d| d.image = event_target_value(&ev))
                    />

                    <div class="form-actions">
                        <button type="button" class="btn btn-outline" on:click=move |_| close()>"Cancelar"</button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() { "Adicionando..." } else { "Adicionar" }}
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
