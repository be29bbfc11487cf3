use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AntecedentCategory, DossierStatus, TreatmentCategory};
use super::lenient;
use super::visite::Visite;
use crate::store::{contains_ci, Record, Searchable};

/// Medical history item. `categorie` is kept verbatim: values outside the
/// known enumeration are displayed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antecedent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub categorie: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub details: String,
}

impl Antecedent {
    pub fn new(category: AntecedentCategory, details: &str) -> Self {
        Self {
            categorie: category.as_str().to_string(),
            details: details.to_string(),
        }
    }

    pub fn category(&self) -> Option<AntecedentCategory> {
        self.categorie.parse().ok()
    }

    pub fn label(&self) -> String {
        self.category()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| self.categorie.clone())
    }
}

/// Active treatment item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traitement {
    #[serde(default, deserialize_with = "lenient::string")]
    pub categorie: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub details: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub posologie: String,
}

impl Traitement {
    pub fn new(category: TreatmentCategory, details: &str, posologie: &str) -> Self {
        Self {
            categorie: category.as_str().to_string(),
            details: details.to_string(),
            posologie: posologie.to_string(),
        }
    }

    pub fn category(&self) -> Option<TreatmentCategory> {
        self.categorie.parse().ok()
    }

    pub fn label(&self) -> String {
        self.category()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| self.categorie.clone())
    }
}

/// Dossier summary embedded in a patient payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DossierRef {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub numero_dossier: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_enum")]
    pub status: Option<DossierStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prenom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_naissance: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sexe: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub adresse: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub telephone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub numero_secu: String,
    #[serde(default, deserialize_with = "lenient::opt_u8")]
    pub stade: Option<u8>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub medecin_referent: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub antecedents: Vec<Antecedent>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub traitements: Vec<Traitement>,
    #[serde(default)]
    pub dossier: Option<DossierRef>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub visites: Vec<Visite>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        super::parse_date(&self.date_naissance)
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date()
            .and_then(|birth| super::age_in_years(birth, today))
    }

    pub fn numero_dossier(&self) -> Option<&str> {
        self.dossier.as_ref()?.numero_dossier.as_deref()
    }
}

impl Record for Patient {
    fn record_id(&self) -> u64 {
        self.id
    }
}

impl Searchable for Patient {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.nom, needle)
            || contains_ci(&self.prenom, needle)
            || contains_ci(&self.numero_secu, needle)
    }
}

/// Body sent on patient create / update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub nom: String,
    pub prenom: String,
    pub date_naissance: String,
    pub sexe: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
    pub numero_secu: String,
    pub medecin_referent: String,
    pub stade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antecedents: Option<Vec<Antecedent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traitements: Option<Vec<Traitement>>,
}

impl PatientInput {
    /// Pre-fill the "Informations" form from a loaded patient.
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            nom: patient.nom.clone(),
            prenom: patient.prenom.clone(),
            date_naissance: super::date_input_value(&patient.date_naissance),
            sexe: patient.sexe.clone().unwrap_or_default(),
            adresse: patient.adresse.clone().unwrap_or_default(),
            telephone: patient.telephone.clone().unwrap_or_default(),
            email: patient.email.clone().unwrap_or_default(),
            numero_secu: patient.numero_secu.clone(),
            medecin_referent: patient.medecin_referent.clone().unwrap_or_default(),
            stade: patient.stade,
            antecedents: None,
            traitements: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 12,
            "nom": "Dupont",
            "prenom": "Marie",
            "date_naissance": "1958-04-12T00:00:00.000000Z",
            "sexe": "F",
            "adresse": null,
            "numero_secu": "2580412345678",
            "stade": "3",
            "antecedents": [
                {"categorie": "maladies_chroniques", "details": "Hypertension"},
                {"categorie": "inconnue", "details": "Divers"}
            ],
            "traitements": null,
            "dossier": {"id": 4, "numero_dossier": "DOS-2024-004", "status": "stable"}
        }"#
    }

    #[test]
    fn parses_lenient_payload() {
        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(patient.stade, Some(3));
        assert_eq!(patient.adresse, None);
        assert!(patient.traitements.is_empty());
        assert!(patient.visites.is_empty());
        assert_eq!(patient.numero_dossier(), Some("DOS-2024-004"));
    }

    #[test]
    fn unknown_category_keeps_raw_label() {
        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(patient.antecedents[0].label(), "Maladies chroniques");
        assert_eq!(patient.antecedents[1].category(), None);
        assert_eq!(patient.antecedents[1].label(), "inconnue");
    }

    #[test]
    fn unknown_dossier_status_is_dropped() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": 1,
            "dossier": {"id": 9, "numero_dossier": "DOS-9", "status": "archive"}
        }))
        .unwrap();
        let dossier = patient.dossier.unwrap();
        assert_eq!(dossier.status, None);
        assert_eq!(dossier.numero_dossier.as_deref(), Some("DOS-9"));

        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(patient.dossier.unwrap().status, Some(DossierStatus::Stable));
    }

    #[test]
    fn age_from_iso_birth_date() {
        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(patient.age_on(today), Some(66));
    }

    #[test]
    fn search_matches_name_and_secu() {
        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        assert!(patient.matches("dup"));
        assert!(patient.matches("marie"));
        assert!(patient.matches("04123"));
        assert!(!patient.matches("martin"));
    }

    #[test]
    fn input_from_patient_uses_date_only() {
        let patient: Patient = serde_json::from_str(sample_json()).unwrap();
        let input = PatientInput::from_patient(&patient);
        assert_eq!(input.date_naissance, "1958-04-12");
        assert_eq!(input.sexe, "F");
        assert_eq!(input.adresse, "");
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("antecedents").is_none());
    }
}
