use wasm_bindgen::prelude::*;

use crate::{ReportConfig, ReportInput};

/// Render a report from a JS object shaped like [`ReportInput`].
#[wasm_bindgen]
pub fn render_report(input: JsValue) -> Result<Vec<u8>, JsValue> {
    let input: ReportInput = serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Invalid report input: {}", e)))?;
    Ok(crate::render_input(&input, &ReportConfig::default()))
}

/// Render a report from its JSON text.
#[wasm_bindgen]
pub fn render_report_json(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::render_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn report_file_name(municipality: &str) -> String {
    crate::report_file_name_now(municipality)
}
