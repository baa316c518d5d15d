//! Runtime Configuration
//!
//! Backend settings come from `window.__WEDDING_CONFIG__` when the host
//! page defines it, otherwise from the build environment.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use registry_core::remote::{ConfigError, SupabaseConfig};

const WINDOW_KEY: &str = "__WEDDING_CONFIG__";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub log_level: String,
    /// Problem reading the window object, reported once logging is up
    pub warning: Option<String>,
}

impl RuntimeConfig {
    pub fn load() -> Self {
        let (window, warning) = match read_window_config() {
            Ok(config) => (config.unwrap_or_default(), None),
            Err(e) => (WindowConfig::default(), Some(e)),
        };
        Self {
            supabase_url: window
                .supabase_url
                .unwrap_or_else(|| option_env!("SUPABASE_URL").unwrap_or_default().to_string()),
            supabase_anon_key: window
                .supabase_anon_key
                .unwrap_or_else(|| option_env!("SUPABASE_ANON_KEY").unwrap_or_default().to_string()),
            log_level: window
                .log_level
                .unwrap_or_else(|| option_env!("WEDDING_LOG_LEVEL").unwrap_or("info").to_string()),
            warning,
        }
    }

    pub fn supabase(&self) -> Result<SupabaseConfig, ConfigError> {
        SupabaseConfig::new(&self.supabase_url, &self.supabase_anon_key)
    }
}

fn read_window_config() -> Result<Option<WindowConfig>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(WINDOW_KEY))
        .map_err(|e| format!("{} lookup failed: {:?}", WINDOW_KEY, e))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| format!("{} is malformed: {}", WINDOW_KEY, e))
}
