// Small DOM helpers shared by the views and control wiring
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::error::BrowserError;

pub fn window() -> Result<Window, BrowserError> {
    web_sys::window().ok_or(BrowserError::NoWindow)
}

pub fn document() -> Result<Document, BrowserError> {
    window()?.document().ok_or(BrowserError::NoWindow)
}

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, BrowserError> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
        .ok_or_else(|| BrowserError::MissingElement(id.to_string()))
}

pub fn create_element<T: JsCast>(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<T, BrowserError> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    element
        .dyn_into::<T>()
        .map_err(|_| BrowserError::Js(format!("<{}> has an unexpected element type", tag)))
}
