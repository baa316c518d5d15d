//! Wedding Registry Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod models;
mod store;
mod sync;

use app::App;
use config::RuntimeConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = RuntimeConfig::load();
    // Err only when a logger is already installed
    let _ = rolling_logger::init(rolling_logger::parse_level(&config.log_level));
    if let Some(warning) = &config.warning {
        log::warn!("{}", warning);
    }
    log::info!("wedding registry starting");

    mount_to_body(move || view! { <App config=config /> });
}
