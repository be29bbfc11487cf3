use serde::{Deserialize, Serialize};

use super::enums::DossierStatus;
use super::lenient;
use crate::store::{contains_ci, Record, Searchable};

/// Patient summary embedded in a dossier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DossierPatient {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prenom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub numero_dossier: String,
    /// Unknown or missing values read as `DossierStatus::default()`.
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub status: DossierStatus,
    #[serde(default)]
    pub patient: Option<DossierPatient>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: String,
}

impl Dossier {
    pub fn patient_name(&self) -> String {
        self.patient
            .as_ref()
            .map(|p| format!("{} {}", p.prenom, p.nom).trim().to_string())
            .unwrap_or_default()
    }
}

impl Record for Dossier {
    fn record_id(&self) -> u64 {
        self.id
    }
}

impl Searchable for Dossier {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.numero_dossier, needle)
            || self
                .patient
                .as_ref()
                .is_some_and(|p| contains_ci(&p.nom, needle) || contains_ci(&p.prenom, needle))
    }
}
