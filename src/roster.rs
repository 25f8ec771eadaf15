//! Process-local roster of engineers who may sign a report.
//!
//! Records hold an `engineer_id`; the roster resolves it at render time.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::model::catalog::STATE_CODES;
use crate::model::Engineer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    engineers: Vec<Engineer>,
}

impl Default for Roster {
    /// The engineers registered when the program starts.
    fn default() -> Self {
        let seed = [
            ("1", "Daniel"),
            ("2", "Débora"),
            ("3", "Lorena"),
            ("4", "Tainara"),
        ];
        Self {
            engineers: seed
                .iter()
                .map(|(id, name)| Engineer {
                    id: id.to_string(),
                    full_name: name.to_string(),
                    license_number: "98.123/D".to_string(),
                    state_code: "PR".to_string(),
                })
                .collect(),
        }
    }
}

impl Roster {
    pub fn empty() -> Self {
        Self {
            engineers: Vec::new(),
        }
    }

    pub fn from_engineers(engineers: Vec<Engineer>) -> Self {
        Self { engineers }
    }

    /// Add an engineer and return the stored entry with its new id.
    ///
    /// Ids are numeric strings, one past the largest numeric id in use. The
    /// state code must be one of [`STATE_CODES`] (any case).
    pub fn register(
        &mut self,
        full_name: &str,
        license_number: &str,
        state_code: &str,
    ) -> Result<Engineer, ReportError> {
        let state_code = state_code.trim().to_uppercase();
        if !STATE_CODES.contains(&state_code.as_str()) {
            return Err(ReportError::UnknownStateCode(state_code));
        }
        let next_id = self
            .engineers
            .iter()
            .filter_map(|e| e.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        let engineer = Engineer {
            id: next_id.to_string(),
            full_name: full_name.trim().to_string(),
            license_number: license_number.trim().to_string(),
            state_code,
        };
        log::debug!("registered engineer {} ({})", engineer.id, engineer.full_name);
        self.engineers.push(engineer.clone());
        Ok(engineer)
    }

    pub fn resolve(&self, id: &str) -> Option<&Engineer> {
        self.engineers.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Engineer> {
        self.engineers.iter()
    }

    pub fn len(&self) -> usize {
        self.engineers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engineers.is_empty()
    }
}
