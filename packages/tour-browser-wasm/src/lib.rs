use std::collections::BTreeMap;

use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

pub mod console;
pub mod cards;
pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod feature_store;
pub mod filter;
pub mod navigation;
pub mod pipeline;
pub mod tour_map;

mod app;
mod dom;
mod mapbox;


use config::BrowserConfig;
use error::BrowserError;
use feature_store::FeatureStore;
use filter::{FilterState, DEFAULT_TEXT_FIELDS};

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => ($crate::console::warn(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => ($crate::console::error(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("Tour browser module initialized");
    });
}

/// Mounts the search, cards and map on the current page and starts loading
/// the tour data. `config` may be `undefined` to use the default element ids.
#[wasm_bindgen]
pub fn start_tour_browser(config: JsValue) -> Result<(), JsValue> {
    start();
    let config = BrowserConfig::from_js(config)?;
    let app = app::App::mount(config)?;
    wasm_bindgen_futures::spawn_local(app.load());
    Ok(())
}

/// Filters a GeoJSON document without touching the page. `selections` is an
/// object of property name to wanted value; `undefined` means none.
#[wasm_bindgen]
pub fn filter_tour_collection(
    geojson: &str,
    query: &str,
    selections: JsValue,
) -> Result<String, JsValue> {
    let selections: BTreeMap<String, String> = if selections.is_undefined() || selections.is_null() {
        BTreeMap::new()
    } else {
        serde_wasm_bindgen::from_value(selections).map_err(BrowserError::from)?
    };
    Ok(filter_collection(geojson, query, &selections)?)
}

pub fn filter_collection(
    geojson: &str,
    query: &str,
    selections: &BTreeMap<String, String>,
) -> Result<String, BrowserError> {
    let store = FeatureStore::from_geojson_str(geojson, &[])?;
    let state = selections
        .iter()
        .fold(FilterState::new(query), |state, (field, value)| {
            state.with_selection(field, value)
        });
    let text_fields: Vec<String> = DEFAULT_TEXT_FIELDS.iter().map(|f| f.to_string()).collect();

    let features: Vec<Value> = store
        .filter(&state, &text_fields)
        .iter()
        .map(|v| v.feature.to_geojson(None))
        .collect();
    Ok(json!({ "type": "FeatureCollection", "features": features }).to_string())
}
