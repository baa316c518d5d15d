//! Hero Section Component
//!
//! Page header with the couple's names, date and welcome message.

use leptos::prelude::*;

use crate::store::RegistryStateStoreFields;
use crate::sync::use_registry;

#[component]
pub fn HeroSection() -> impl IntoView {
    let registry = use_registry();

    view! {
        <section class="hero">
            <div class="hero-backdrop"></div>
            <div class="hero-content">
                <p class="hero-kicker">"Lista de Presentes"</p>
                <h1 class="hero-title">{move || registry.store.info().read().couple.clone()}</h1>
                <div class="hero-divider"></div>
                <p class="hero-date">{move || registry.store.info().read().date.clone()}</p>
                <p class="hero-message">{move || registry.store.info().read().message.clone()}</p>
            </div>
        </section>
    }
}
