//! # Laudo
//!
//! Storm-damage inspection reports for the state civil-defense emergency
//! fund, laid out INTO pages.
//!
//! A field engineer fills one [`InspectionRecord`] per visited property. The
//! engine turns it into a fixed-template A4 PDF: institutional header and
//! footer on every page, property identification, one section per observed
//! damage with its description and up to two photos, and a closing unit with
//! the final classification and the engineer's signature block.
//!
//! Sections are measured before they are drawn and never split across pages.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    : InspectionRecord, damage entries, classification
//!       ↓
//!   [roster]   : resolve engineer_id to an Engineer
//!       ↓
//!   [layout]   : section-atomic page flow
//!       ↓
//!   [pdf]      : Serialize to PDF bytes
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod roster;
pub mod services;
pub mod style;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use config::ReportConfig;
pub use error::{ReportError, ServiceError};
pub use model::{Classification, DamageEntry, Engineer, InspectionRecord, Photo, PhotoFormat};
pub use roster::Roster;

use font::FontContext;
use layout::LayoutEngine;
use pdf::{Metadata, PdfWriter};

/// A record together with the roster used to resolve its engineer.
///
/// When `roster` is absent the built-in roster is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub record: InspectionRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<Roster>,
}

/// Render a report to PDF bytes with the default template.
///
/// This is the primary entry point. A missing engineer renders placeholder
/// text; rendering never fails.
pub fn render(record: &InspectionRecord, engineer: Option<&Engineer>) -> Vec<u8> {
    render_with_config(record, engineer, &ReportConfig::default())
}

/// Render a report to PDF bytes with a custom template configuration.
pub fn render_with_config(
    record: &InspectionRecord,
    engineer: Option<&Engineer>,
    config: &ReportConfig,
) -> Vec<u8> {
    let font_context = FontContext::new();
    let engine = LayoutEngine::new(config);
    let pages = engine.layout(record, engineer, &font_context);
    PdfWriter::new().write(&pages, &metadata_for(record, engineer, config))
}

/// Render a [`ReportInput`] described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, ReportError> {
    render_json_with_config(json, &ReportConfig::default())
}

pub fn render_json_with_config(json: &str, config: &ReportConfig) -> Result<Vec<u8>, ReportError> {
    let input: ReportInput = serde_json::from_str(json)?;
    Ok(render_input(&input, config))
}

/// Resolve the engineer against the input's roster (or the built-in one)
/// and render.
pub fn render_input(input: &ReportInput, config: &ReportConfig) -> Vec<u8> {
    let default_roster;
    let roster = match &input.roster {
        Some(roster) => roster,
        None => {
            default_roster = Roster::default();
            &default_roster
        }
    };
    let engineer = roster.resolve(&input.record.engineer_id);
    if engineer.is_none() && !input.record.engineer_id.is_empty() {
        log::warn!(
            "engineer '{}' is not on the roster, signing with placeholders",
            input.record.engineer_id
        );
    }
    render_with_config(&input.record, engineer, config)
}

fn metadata_for(
    record: &InspectionRecord,
    engineer: Option<&Engineer>,
    config: &ReportConfig,
) -> Metadata {
    let title = if record.municipality.is_empty() {
        config.texts.title.clone()
    } else {
        format!("{} - {}", config.texts.title, record.municipality.to_uppercase())
    };
    Metadata {
        title: Some(title),
        author: engineer.map(|e| e.full_name.clone()),
        subject: Some(record.full_address.clone()).filter(|a| !a.is_empty()),
    }
}

/// Download name for a report: `laudo_<municipality>_<timestamp_ms>.pdf`.
pub fn report_file_name(municipality: &str, timestamp_ms: i64) -> String {
    format!("laudo_{}_{}.pdf", municipality, timestamp_ms)
}

/// [`report_file_name`] stamped with the current time.
pub fn report_file_name_now(municipality: &str) -> String {
    report_file_name(municipality, now_ms())
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> i64 {
    #[cfg(feature = "wasm")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(feature = "wasm"))]
    {
        0
    }
}
