//! Gift List Component
//!
//! Section title, progress bar, filter chips and the gift grid.

use leptos::prelude::*;
use registry_core::{GiftFilter, Progress};

use crate::components::GiftCard;
use crate::models::gift_key;
use crate::store::RegistryStateStoreFields;
use crate::sync::use_registry;

#[component]
pub fn GiftList() -> impl IntoView {
    let registry = use_registry();
    let (filter, set_filter) = signal(GiftFilter::All);

    let progress = Memo::new(move |_| registry.store.gifts().with(|gifts| Progress::of(gifts)));
    let visible = Memo::new(move |_| {
        let filter = filter.get();
        registry.store.gifts().with(|gifts| filter.apply(gifts))
    });

    view! {
        <section class="gift-section">
            <div class="section-heading">
                <h2>"Lista de Presentes"</h2>
                <p class="section-subtitle">"Escolha um presente e faça parte deste momento especial"</p>

                <div class="progress">
                    <div class="progress-labels">
                        <span>{move || progress.get().summary()}</span>
                        <span>{move || format!("{}%", progress.get().rounded_percent())}</span>
                    </div>
                    <div class="progress-track">
                        <div
                            class="progress-fill"
                            style:width=move || format!("{}%", progress.get().percent())
                        ></div>
                    </div>
                </div>
            </div>

            <div class="filter-row">
                {GiftFilter::ALL
                    .into_iter()
                    .map(|option| {
                        view! {
                            <button
                                class=move || {
                                    if filter.get() == option { "filter-chip active" } else { "filter-chip" }
                                }
                                on:click=move |_| set_filter.set(option)
                            >
                                {option.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <Show
                when=move || !registry.store.loading().get()
                fallback=|| view! { <p class="gift-empty">"Carregando presentes..."</p> }
            >
                <div class="gift-grid">
                    <For
                        each=move || visible.get()
                        key=gift_key
                        children=|gift| view! { <GiftCard gift=gift /> }
                    />
                </div>
                <Show when=move || visible.with(|gifts| gifts.is_empty())>
                    <p class="gift-empty">"Nenhum presente encontrado nesta categoria."</p>
                </Show>
            </Show>
        </section>
    }
}
