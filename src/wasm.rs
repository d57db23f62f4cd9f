//! WASM bindings for the browser extension and the editor plugin.
//!
//! This module exposes capture and conversion to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::blocks::{ConvertOptions, convert_html, to_json};
use crate::capture::{CaptureOptions, capture_html};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Capture the element matching `selector` in a serialized page.
///
/// `css` holds the text of linked stylesheets the page could not inline.
#[wasm_bindgen(js_name = captureHtml)]
pub fn capture(
    page: &str,
    selector: &str,
    css: Vec<String>,
    base_url: Option<String>,
) -> Result<String, JsValue> {
    let mut options = CaptureOptions::default();
    if let Some(base_url) = base_url {
        options = options
            .with_base_url(&base_url)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    }
    capture_html(page, selector, &css, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert styled HTML to a block tree, returned as JSON (`false` for none).
#[wasm_bindgen(js_name = convertHtml)]
pub fn convert(html: &str, button_classes: Option<Vec<String>>) -> Result<String, JsValue> {
    let mut options = ConvertOptions::default();
    if let Some(classes) = button_classes {
        options.button_classes = classes;
    }
    to_json(convert_html(html, &options).as_ref(), false)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
