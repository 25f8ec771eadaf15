//! # Report Configuration
//!
//! Page geometry and the fixed template texts. Geometry is written in
//! millimetres, the unit the report template was designed in, and converted
//! to PDF points once by [`PageGeometry::resolve`].
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "geometry": { "safeMargin": 8 }, "surveyOnNewPage": true }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::style::Color;

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm(v: f64) -> f64 {
    v * PT_PER_MM
}

/// Page geometry, in millimetres. Vertical offsets are measured from the
/// top edge of the page; text offsets refer to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    /// Usable width for wrapped paragraphs.
    pub text_width: f64,
    /// Baseline of the first header line.
    pub header_top: f64,
    pub header_line_spacing: f64,
    /// Where the cursor starts on every page.
    pub content_top: f64,
    /// Distance from the bottom edge to the footer divider.
    pub footer_height: f64,
    /// Gap kept clear above the footer divider.
    pub safe_margin: f64,
    /// Baselines of the footer lines, measured up from the bottom edge.
    pub footer_line_offsets: [f64; 3],
    /// Where the divider switches from the first to the second color.
    pub divider_split_x: f64,
    pub divider_end_x: f64,
    pub divider_width: f64,
    /// Line height of wrapped description paragraphs.
    pub paragraph_line_height: f64,
    /// Vertical step between labelled fields.
    pub field_spacing: f64,
    pub photo_width: f64,
    pub photo_height: f64,
    /// Horizontal step from one photo slot to the next.
    pub photo_step: f64,
    /// Vertical space consumed by a photo row.
    pub photo_row_height: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 20.0,
            text_width: 170.0,
            header_top: 20.0,
            header_line_spacing: 5.0,
            content_top: 50.0,
            footer_height: 25.0,
            safe_margin: 5.0,
            footer_line_offsets: [18.0, 14.0, 8.0],
            divider_split_x: 150.0,
            divider_end_x: 190.0,
            divider_width: 1.5,
            paragraph_line_height: 5.0,
            field_spacing: 10.0,
            photo_width: 80.0,
            photo_height: 60.0,
            photo_step: 90.0,
            photo_row_height: 70.0,
        }
    }
}

/// [`PageGeometry`] converted to points, plus the derived page-break limit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    pub text_width: f64,
    pub center_x: f64,
    pub header_top: f64,
    pub header_line_spacing: f64,
    pub content_top: f64,
    pub divider_y: f64,
    pub divider_split_x: f64,
    pub divider_end_x: f64,
    pub divider_width: f64,
    pub footer_baselines: [f64; 3],
    /// A section may not extend below this cursor position.
    pub content_bottom: f64,
    pub paragraph_line_height: f64,
    pub field_spacing: f64,
    pub photo_width: f64,
    pub photo_height: f64,
    pub photo_step: f64,
    pub photo_row_height: f64,
}

impl PageGeometry {
    pub fn resolve(&self) -> ResolvedGeometry {
        let page_height = mm(self.page_height);
        let footer_height = mm(self.footer_height);
        ResolvedGeometry {
            page_width: mm(self.page_width),
            page_height,
            margin_left: mm(self.margin_left),
            text_width: mm(self.text_width),
            center_x: mm(self.page_width) / 2.0,
            header_top: mm(self.header_top),
            header_line_spacing: mm(self.header_line_spacing),
            content_top: mm(self.content_top),
            divider_y: page_height - footer_height,
            divider_split_x: mm(self.divider_split_x),
            divider_end_x: mm(self.divider_end_x),
            divider_width: mm(self.divider_width),
            footer_baselines: self.footer_line_offsets.map(|o| page_height - mm(o)),
            content_bottom: page_height - footer_height - mm(self.safe_margin),
            paragraph_line_height: mm(self.paragraph_line_height),
            field_spacing: mm(self.field_spacing),
            photo_width: mm(self.photo_width),
            photo_height: mm(self.photo_height),
            photo_step: mm(self.photo_step),
            photo_row_height: mm(self.photo_row_height),
        }
    }
}

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSizes {
    pub header: f64,
    pub title: f64,
    pub heading: f64,
    pub body: f64,
    pub footer: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            header: 11.0,
            title: 14.0,
            heading: 12.0,
            body: 10.0,
            footer: 8.0,
        }
    }
}

/// Fixed texts printed on every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateTexts {
    /// Centered bold lines at the top of every page.
    pub header_lines: [String; 3],
    pub title: String,
    pub footer_address: String,
    pub footer_contact: String,
    pub footer_slogan: String,
    pub engineer_title: String,
    pub missing_engineer_name: String,
    pub missing_engineer_license: String,
}

impl Default for TemplateTexts {
    fn default() -> Self {
        Self {
            header_lines: [
                "ESTADO DO PARANÁ".to_string(),
                "COORDENADORIA ESTADUAL DA DEFESA CIVIL".to_string(),
                "FUNDO ESTADUAL PARA CALAMIDADES PÚBLICAS".to_string(),
            ],
            title: "LAUDO DE IMÓVEL AFETADO POR EVENTO CLIMÁTICO".to_string(),
            footer_address:
                "Palácio das Araucárias - 1º andar - Setor C | Centro Cívico | Curitiba/PR | CEP 80.530-140"
                    .to_string(),
            footer_contact: "E-mail: defesacivil@defesacivil.pr.gov.br | Fone: (41) 3281-2500"
                .to_string(),
            footer_slogan: "“Defesa Civil somos todos nós”".to_string(),
            engineer_title: "Engenheiro Civil".to_string(),
            missing_engineer_name: "NOME DO ENGENHEIRO NÃO INFORMADO".to_string(),
            missing_engineer_license: "REGISTRO NÃO INFORMADO".to_string(),
        }
    }
}

/// Everything the layout engine needs besides the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub font_sizes: FontSizes,
    pub texts: TemplateTexts,
    pub divider_colors: [Color; 2],
    /// Start the damage survey on its own page, leaving page one for the
    /// property identification.
    pub survey_on_new_page: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            font_sizes: FontSizes::default(),
            texts: TemplateTexts::default(),
            divider_colors: [Color::rgb8(0, 102, 204), Color::rgb8(0, 153, 51)],
            survey_on_new_page: false,
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }
}
