//! # External Capabilities
//!
//! The map picker and the photo-description assistant live outside the
//! engine. They are injected as traits so the capture layer can plug in a
//! real service and tests can plug in a fake one.
//!
//! Both follow the same policy: a failed call is logged and the record is
//! left as it was. Nothing downstream waits on them.

use crate::error::{ReportError, ServiceError};
use crate::model::{Coordinates, InspectionRecord, Photo};

/// Forward and reverse geocoding.
pub trait Geocoder {
    /// Find coordinates for a free-form address query.
    fn search(&self, query: &str) -> Result<Coordinates, ServiceError>;
    /// Find a printable address for a coordinate pair.
    fn reverse_geocode(&self, coordinates: &Coordinates) -> Result<String, ServiceError>;
}

/// Produces a technical description of the damage visible in a photo.
pub trait DamageDescriber {
    fn describe(&self, damage_type: &str, photo: &Photo) -> Result<String, ServiceError>;
}

/// Instruction text sent along with the photo to a description service.
pub fn describe_prompt(damage_type: &str) -> String {
    format!(
        "Você é um engenheiro da Defesa Civil do Paraná. Descreva tecnicamente o dano no elemento \"{}\" visível nesta imagem. Seja sucinto e use terminologia de engenharia diagnóstica. Responda apenas com a descrição técnica.",
        damage_type
    )
}

impl InspectionRecord {
    /// Locate `query` and fill coordinates and, when the reverse lookup
    /// succeeds, the address. Returns whether the coordinates changed.
    pub fn locate(&mut self, geocoder: &dyn Geocoder, query: &str) -> bool {
        let coordinates = match geocoder.search(query) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("address search for '{}' failed: {}", query, e);
                return false;
            }
        };

        match geocoder.reverse_geocode(&coordinates) {
            Ok(address) => self.full_address = address,
            Err(e) => log::warn!(
                "reverse geocoding {}, {} failed: {}",
                coordinates.latitude,
                coordinates.longitude,
                e
            ),
        }
        self.coordinates = coordinates;
        true
    }

    /// Ask `describer` about the first photo of a damage entry and store the
    /// answer as its technical description.
    ///
    /// Returns `Ok(false)` when the entry has no photo or the service failed.
    pub fn describe_damage(
        &mut self,
        describer: &dyn DamageDescriber,
        damage_type: &str,
    ) -> Result<bool, ReportError> {
        let entry = self.damage_mut(damage_type)?;
        let Some(photo) = entry.photos.first() else {
            return Ok(false);
        };
        match describer.describe(damage_type, photo) {
            Ok(text) => {
                entry.technical_description = text.trim().to_string();
                Ok(true)
            }
            Err(e) => {
                log::warn!("description for '{}' failed: {}", damage_type, e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoFormat;

    struct FixedGeocoder {
        reverse_ok: bool,
    }

    impl Geocoder for FixedGeocoder {
        fn search(&self, query: &str) -> Result<Coordinates, ServiceError> {
            if query.contains("Curitiba") {
                Ok(Coordinates {
                    latitude: "-25.4284".to_string(),
                    longitude: "-49.2733".to_string(),
                })
            } else {
                Err(ServiceError::NotFound(query.to_string()))
            }
        }

        fn reverse_geocode(&self, _: &Coordinates) -> Result<String, ServiceError> {
            if self.reverse_ok {
                Ok("Rua XV de Novembro, Centro, Curitiba".to_string())
            } else {
                Err(ServiceError::Unavailable("timeout".to_string()))
            }
        }
    }

    struct EchoDescriber;

    impl DamageDescriber for EchoDescriber {
        fn describe(&self, damage_type: &str, photo: &Photo) -> Result<String, ServiceError> {
            Ok(format!("  {} ({} bytes)\n", damage_type, photo.bytes.len()))
        }
    }

    struct DownDescriber;

    impl DamageDescriber for DownDescriber {
        fn describe(&self, _: &str, _: &Photo) -> Result<String, ServiceError> {
            Err(ServiceError::Unavailable("quota".to_string()))
        }
    }

    fn record_with_photo() -> InspectionRecord {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Cobertura").unwrap();
        record
            .attach_photos("Cobertura", [Photo::new(PhotoFormat::Jpeg, vec![0xFF, 0xD8, 0xFF])])
            .unwrap();
        record
    }

    #[test]
    fn locate_fills_coordinates_and_address() {
        let mut record = InspectionRecord::default();
        assert!(record.locate(&FixedGeocoder { reverse_ok: true }, "Centro, Curitiba"));
        assert_eq!(record.coordinates.latitude, "-25.4284");
        assert_eq!(record.full_address, "Rua XV de Novembro, Centro, Curitiba");
    }

    #[test]
    fn failed_search_leaves_record_untouched() {
        let mut record = InspectionRecord {
            full_address: "antes".to_string(),
            ..Default::default()
        };
        let before = record.clone();
        assert!(!record.locate(&FixedGeocoder { reverse_ok: true }, "Atlantis"));
        assert_eq!(record, before);
    }

    #[test]
    fn failed_reverse_keeps_address() {
        let mut record = InspectionRecord {
            full_address: "digitado".to_string(),
            ..Default::default()
        };
        assert!(record.locate(&FixedGeocoder { reverse_ok: false }, "Curitiba"));
        assert_eq!(record.full_address, "digitado");
        assert_eq!(record.coordinates.longitude, "-49.2733");
    }

    #[test]
    fn description_is_stored_trimmed() {
        let mut record = record_with_photo();
        assert!(record.describe_damage(&EchoDescriber, "Cobertura").unwrap());
        assert_eq!(
            record.damage("Cobertura").unwrap().technical_description,
            "Cobertura (3 bytes)"
        );
    }

    #[test]
    fn description_failure_is_not_an_error() {
        let mut record = record_with_photo();
        assert!(!record.describe_damage(&DownDescriber, "Cobertura").unwrap());
        assert!(record.damage("Cobertura").unwrap().technical_description.is_empty());
    }

    #[test]
    fn description_needs_a_photo() {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Forro").unwrap();
        assert!(!record.describe_damage(&EchoDescriber, "Forro").unwrap());
        assert!(record.describe_damage(&EchoDescriber, "Piso").is_err());
    }

    #[test]
    fn prompt_names_the_element() {
        assert!(describe_prompt("Forro").contains("\"Forro\""));
    }
}
