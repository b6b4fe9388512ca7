use thiserror::Error;
use tour_models::ModelError;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("no browser window available")]
    NoWindow,
    #[error("element #{0} is missing or has an unexpected type")]
    MissingElement(String),
    #[error("request for {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("JavaScript error: {0}")]
    Js(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<JsValue> for BrowserError {
    fn from(value: JsValue) -> Self {
        BrowserError::Js(describe_js_error(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for BrowserError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        BrowserError::Config(err.to_string())
    }
}

impl From<BrowserError> for JsValue {
    fn from(err: BrowserError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}
