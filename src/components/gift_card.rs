//! Gift Card Component
//!
//! One gift in the grid: details, purchase dialog, undo and admin removal.

use leptos::prelude::*;
use leptos::task::spawn_local;

use registry_core::form::buyer_name;
use registry_core::format_price;

use crate::components::{DeleteConfirmButton, Modal};
use crate::context::use_app_context;
use crate::models::GiftItem;
use crate::sync::use_registry;

#[component]
pub fn GiftCard(gift: GiftItem) -> impl IntoView {
    let ctx = use_app_context();
    let registry = use_registry();

    let (show_dialog, set_show_dialog) = signal(false);
    let (buyer, set_buyer) = signal(String::new());

    let purchased = gift.purchased;
    let price = gift.display_price().map(format_price);
    let purchaser = gift.purchaser().map(str::to_string);
    let dialog_title = format!("Presentear: {}", gift.name);
    let gift = StoredValue::new(gift);

    let confirm_purchase = move || {
        let name = match buyer_name(&buyer.get_untracked()) {
            Ok(name) => name,
            Err(e) => {
                ctx.error(e.to_string());
                return;
            }
        };
        set_show_dialog.set(false);
        set_buyer.set(String::new());
        spawn_local(async move {
            match registry.toggle_purchased(gift.get_value(), name.clone()).await {
                Ok(_) => ctx.success(format!("Obrigado, {}! 🎁", name)),
                Err(e) => ctx.error(e),
            }
        });
    };

    let undo_purchase = move |_| {
        spawn_local(async move {
            match registry.toggle_purchased(gift.get_value(), String::new()).await {
                Ok(_) => ctx.info("Compra desmarcada."),
                Err(e) => ctx.error(e),
            }
        });
    };

    let remove = move |_: ()| {
        let id = gift.with_value(|g| g.id.clone());
        spawn_local(async move {
            match registry.remove_gift(id).await {
                Ok(()) => ctx.info("Presente removido."),
                Err(e) => ctx.error(e),
            }
        });
    };

    view! {
        <div class=if purchased { "gift-card purchased" } else { "gift-card" }>
            {purchased.then(|| view! { <span class="gift-badge">"✓"</span> })}

            <Show when=move || registry.is_admin()>
                <div class="gift-admin">
                    <DeleteConfirmButton button_class="gift-delete-btn" on_confirm=remove />
                </div>
            </Show>

            <div class="gift-body">
                {gift.with_value(|g| g.image.clone()).map(|src| view! {
                    <img class="gift-image" src=src alt="" loading="lazy" />
                })}
                <div class="gift-text">
                    <h3 class="gift-name">{gift.with_value(|g| g.name.clone())}</h3>
                    {gift.with_value(|g| g.description.clone()).map(|text| view! {
                        <p class="gift-description">{text}</p>
                    })}
                    <div class="gift-meta">
                        {price.map(|price| view! { <span class="gift-price">{price}</span> })}
                        {gift.with_value(|g| g.link.clone()).map(|href| view! {
                            <a class="gift-link" href=href target="_blank" rel="noopener noreferrer">
                                "Ver produto"
                            </a>
                        })}
                    </div>
                    {purchaser.map(|name| view! {
                        <p class="gift-purchaser">{format!("Comprado por {} ✓", name)}</p>
                    })}
                </div>
            </div>

            <div class="gift-actions">
                {if purchased {
                    view! {
                        <button class="btn btn-ghost" on:click=undo_purchase>"Desmarcar compra"</button>
                    }
                    .into_any()
                } else {
                    view! {
                        <button class="btn btn-primary" on:click=move |_| set_show_dialog.set(true)>
                            "Vou presentear!"
                        </button>
                    }
                    .into_any()
                }}
            </div>
        </div>

        <Modal
            open=show_dialog
            title=dialog_title
            description="Informe seu nome para registrar que você vai presentear com este item."
            on_close=move |_| set_show_dialog.set(false)
        >
            <input
                class="input"
                type="text"
                placeholder="Seu nome"
                prop:value=move || buyer.get()
                on:input=move |ev| set_buyer.set(event_target_value(&ev))
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        confirm_purchase();
                    }
                }
            />
            <div class="modal-footer">
                <button class="btn btn-outline" on:click=move |_| set_show_dialog.set(false)>"Cancelar"</button>
                <button class="btn btn-primary" on:click=move |_| confirm_purchase()>"Confirmar"</button>
            </div>
        </Modal>
    }
}
