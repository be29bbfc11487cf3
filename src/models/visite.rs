use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::VisiteStatus;
use super::lenient;
use crate::store::Record;

/// Result shown for an exam or lab line that has no value yet.
pub const PENDING_RESULT: &str = "en attente";

/// One examen or biologie line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLine {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub resultat: String,
}

impl ResultLine {
    /// Line with a trimmed type; a blank result becomes `PENDING_RESULT`.
    /// Returns `None` when the type is blank.
    pub fn new(kind: &str, resultat: &str) -> Option<Self> {
        let kind = kind.trim();
        if kind.is_empty() {
            return None;
        }
        let resultat = resultat.trim();
        Some(Self {
            kind: kind.to_string(),
            resultat: if resultat.is_empty() {
                PENDING_RESULT.to_string()
            } else {
                resultat.to_string()
            },
        })
    }

    pub fn is_pending(&self) -> bool {
        self.resultat == PENDING_RESULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(default, deserialize_with = "lenient::string")]
    pub medicament: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub posologie: String,
}

impl Prescription {
    /// Both fields are required.
    pub fn new(medicament: &str, posologie: &str) -> Option<Self> {
        let (medicament, posologie) = (medicament.trim(), posologie.trim());
        if medicament.is_empty() || posologie.is_empty() {
            return None;
        }
        Some(Self {
            medicament: medicament.to_string(),
            posologie: posologie.to_string(),
        })
    }
}

/// A clinical encounter. Never deleted: cancellation flips `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visite {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub patient_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub heure: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub medecin: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub motif: String,
    /// Unknown or missing values read as `VisiteStatus::default()`.
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub status: VisiteStatus,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub examens: Vec<ResultLine>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub biologie: Vec<ResultLine>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub prescriptions: Vec<Prescription>,
}

impl Visite {
    pub fn is_active(&self) -> bool {
        !self.status.is_cancelled()
    }

    /// Sort key (date, time); unparsable parts sort first.
    pub fn when(&self) -> (Option<NaiveDate>, Option<NaiveTime>) {
        let date = super::parse_date(&self.date);
        let time = NaiveTime::parse_from_str(self.heure.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(self.heure.trim(), "%H:%M:%S"))
            .ok();
        (date, time)
    }
}

impl Record for Visite {
    fn record_id(&self) -> u64 {
        self.id
    }
}

/// Body for `POST /api/visites` and `PUT /api/visites/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisiteInput {
    pub patient_id: u64,
    pub date: String,
    pub heure: String,
    pub medecin: String,
    pub motif: String,
    pub status: VisiteStatus,
    pub notes: String,
    pub examens: Vec<ResultLine>,
    pub biologie: Vec<ResultLine>,
    pub prescriptions: Vec<Prescription>,
}

impl VisiteInput {
    /// Empty draft for a new visit, planned by default.
    pub fn new(patient_id: u64, date: NaiveDate, heure: NaiveTime) -> Self {
        Self {
            patient_id,
            date: date.format("%Y-%m-%d").to_string(),
            heure: heure.format("%H:%M").to_string(),
            medecin: String::new(),
            motif: String::new(),
            status: VisiteStatus::Planifie,
            notes: String::new(),
            examens: Vec::new(),
            biologie: Vec::new(),
            prescriptions: Vec::new(),
        }
    }

    /// Edit draft pre-filled from an existing visit.
    pub fn from_visite(patient_id: u64, visite: &Visite) -> Self {
        Self {
            patient_id: visite.patient_id.unwrap_or(patient_id),
            date: super::date_input_value(&visite.date),
            heure: visite.heure.clone(),
            medecin: visite.medecin.clone(),
            motif: visite.motif.clone(),
            status: visite.status,
            notes: visite.notes.clone(),
            examens: visite.examens.clone(),
            biologie: visite.biologie.clone(),
            prescriptions: visite.prescriptions.clone(),
        }
    }
}
