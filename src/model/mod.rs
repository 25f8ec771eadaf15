//! # Inspection Model
//!
//! The input representation for the report engine: one [`InspectionRecord`]
//! per editing session, built field by field by the capture form and consumed
//! once by the layout engine.
//!
//! Derived values (destruction level and percentage) are never stored. They
//! are total functions of [`Classification`], so a record can't hold a
//! percentage that disagrees with its rating.

pub mod catalog;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::image_loader;

pub use catalog::{DAMAGE_CATALOG, TYPOLOGY_CATALOG, TYPOLOGY_OTHER};

/// Everything captured for one property damage assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionRecord {
    pub municipality: String,
    pub inspection_date: String,
    /// Reference into the engineer roster, resolved at render time.
    pub engineer_id: String,
    pub municipal_registration: String,
    pub owner_name: String,
    pub requester_name: String,
    pub full_address: String,
    pub coordinates: Coordinates,
    pub typology: String,
    /// Free-text typology, used only when `typology` is [`TYPOLOGY_OTHER`].
    pub typology_other: String,
    /// Ordered by first toggle. Drives render order.
    pub damage_entries: Vec<DamageEntry>,
    pub classification: Classification,
}

/// Decimal-degree text as typed or picked on the map. Not parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// One observed damage category with its description and evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEntry {
    pub damage_type: String,
    #[serde(default)]
    pub technical_description: String,
    /// Append-only during a session.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl DamageEntry {
    pub fn new(damage_type: &str) -> Self {
        Self {
            damage_type: damage_type.to_string(),
            technical_description: String::new(),
            photos: Vec::new(),
        }
    }
}

/// Severity rating chosen by the engineer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    #[serde(rename = "Danos Mínimos")]
    Minor,
    #[serde(rename = "Danos Parciais")]
    Partial,
    #[serde(rename = "Danos Severos")]
    Severe,
    #[serde(rename = "Ruína")]
    Ruin,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Minor,
        Classification::Partial,
        Classification::Severe,
        Classification::Ruin,
    ];

    /// The label printed on the report and used in JSON.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Danos Mínimos",
            Self::Partial => "Danos Parciais",
            Self::Severe => "Danos Severos",
            Self::Ruin => "Ruína",
        }
    }

    pub fn destruction_level(&self) -> &'static str {
        self.destruction().0
    }

    pub fn destruction_percentage(&self) -> &'static str {
        self.destruction().1
    }

    /// (destruction level, considered destruction percentage)
    fn destruction(&self) -> (&'static str, &'static str) {
        match self {
            Self::Minor => ("Sem Destruição", "10%"),
            Self::Partial => ("Destruição Parcial Leve", "40%"),
            Self::Severe => ("Destruição Parcial Grave", "70%"),
            Self::Ruin => ("Destruição Total", "100%"),
        }
    }
}

/// Encoded image formats accepted as damage evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Webp,
}

impl PhotoFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// An encoded photo: format tag plus opaque bytes.
///
/// Serialized as a `data:image/...;base64,` URI, which is what the capture
/// layer hands over. Reading a URI never fails: one that isn't a supported
/// image is kept verbatim and the photo is skipped when the report is laid
/// out, the same as a photo whose bytes don't decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Photo {
    pub format: PhotoFormat,
    pub bytes: Vec<u8>,
    /// The source URI when it could not be parsed.
    rejected_uri: Option<String>,
}

impl Photo {
    pub fn new(format: PhotoFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            rejected_uri: None,
        }
    }

    /// Strict parse, for callers that want to refuse bad uploads up front.
    pub fn from_data_uri(uri: &str) -> Result<Self, ReportError> {
        let (format, bytes) =
            image_loader::parse_data_uri(uri).map_err(ReportError::InvalidPhoto)?;
        Ok(Self::new(format, bytes))
    }

    /// The URI this photo was read from, if it wasn't a supported image.
    pub fn rejected_uri(&self) -> Option<&str> {
        self.rejected_uri.as_deref()
    }

    pub fn to_data_uri(&self) -> String {
        use base64::Engine;
        if let Some(uri) = &self.rejected_uri {
            return uri.clone();
        }
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

impl From<String> for Photo {
    fn from(value: String) -> Self {
        match image_loader::parse_data_uri(&value) {
            Ok((format, bytes)) => Photo::new(format, bytes),
            Err(e) => {
                log::debug!("keeping unreadable photo URI as-is: {}", e);
                Photo {
                    format: PhotoFormat::Jpeg,
                    bytes: Vec::new(),
                    rejected_uri: Some(value),
                }
            }
        }
    }
}

impl From<Photo> for String {
    fn from(photo: Photo) -> Self {
        photo.to_data_uri()
    }
}

/// A registered civil engineer who signs reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    pub id: String,
    pub full_name: String,
    pub license_number: String,
    pub state_code: String,
}

impl InspectionRecord {
    /// A fresh record for a new editing session, dated today.
    pub fn new_session() -> Self {
        Self {
            inspection_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn destruction_level(&self) -> &'static str {
        self.classification.destruction_level()
    }

    pub fn destruction_percentage(&self) -> &'static str {
        self.classification.destruction_percentage()
    }

    /// The typology as printed: the free-text description when "Outro" is
    /// selected, the catalog label otherwise.
    pub fn typology_label(&self) -> &str {
        if self.typology == TYPOLOGY_OTHER {
            &self.typology_other
        } else {
            &self.typology
        }
    }

    /// Select or deselect a damage type.
    ///
    /// Returns `true` if the type was added, `false` if it was removed. A
    /// type appears at most once; new types go to the end of the list.
    pub fn toggle_damage(&mut self, damage_type: &str) -> Result<bool, ReportError> {
        if !catalog::is_catalog_damage(damage_type) {
            return Err(ReportError::UnknownDamageType(damage_type.to_string()));
        }
        if self.damage(damage_type).is_some() {
            self.damage_entries.retain(|d| d.damage_type != damage_type);
            Ok(false)
        } else {
            self.damage_entries.push(DamageEntry::new(damage_type));
            Ok(true)
        }
    }

    /// The entries that go on the report, in order.
    ///
    /// `toggle_damage` keeps the list unique and within the catalog, but a
    /// record read from JSON may not be. Unknown types and repeats of a type
    /// already listed are left out and logged; the first occurrence wins.
    pub fn printable_damage_entries(&self) -> Vec<&DamageEntry> {
        let mut printed: Vec<&DamageEntry> = Vec::with_capacity(self.damage_entries.len());
        for entry in &self.damage_entries {
            if !catalog::is_catalog_damage(&entry.damage_type) {
                log::warn!("leaving out unknown damage type '{}'", entry.damage_type);
            } else if printed.iter().any(|p| p.damage_type == entry.damage_type) {
                log::warn!("leaving out repeated damage type '{}'", entry.damage_type);
            } else {
                printed.push(entry);
            }
        }
        printed
    }

    pub fn damage(&self, damage_type: &str) -> Option<&DamageEntry> {
        self.damage_entries
            .iter()
            .find(|d| d.damage_type == damage_type)
    }

    pub fn damage_mut(&mut self, damage_type: &str) -> Result<&mut DamageEntry, ReportError> {
        self.damage_entries
            .iter_mut()
            .find(|d| d.damage_type == damage_type)
            .ok_or_else(|| ReportError::DamageNotSelected(damage_type.to_string()))
    }

    /// Append photos to a selected damage entry.
    pub fn attach_photos<I>(&mut self, damage_type: &str, photos: I) -> Result<(), ReportError>
    where
        I: IntoIterator<Item = Photo>,
    {
        self.damage_mut(damage_type)?.photos.extend(photos);
        Ok(())
    }

    pub fn set_description(&mut self, damage_type: &str, text: &str) -> Result<(), ReportError> {
        self.damage_mut(damage_type)?.technical_description = text.to_string();
        Ok(())
    }
}
