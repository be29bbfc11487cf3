//! "Rapport" tab: a read-only summary built from the loaded patient file.
//!
//! Nothing here is persisted or sent. Only non-cancelled visits are
//! reported, newest first; the clinical evolution is left to the doctor.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{format_date_fr, ResultLine};
use crate::resources::PatientFile;

pub const NO_CONCLUSION: &str = "Pas de conclusion spécifiée";
pub const ALL_CANCELLED: &str = "Toutes les visites enregistrées ont été annulées.";
pub const PLAN_NEW_VISIT: &str = "Une nouvelle visite devrait être planifiée.";
pub const STANDARD_FOLLOW_UP: &str = "Maintien du traitement actuel. Surveillance régulière de la fonction rénale. Régime alimentaire adapté.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitSummary {
    /// `dd/MM/yyyy`.
    pub date: String,
    pub heure: String,
    pub examens: Vec<ResultLine>,
    pub biologie: Vec<ResultLine>,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalReport {
    pub resume: String,
    pub numero_dossier: String,
    /// One `- details` line per antecedent.
    pub antecedents: String,
    /// One `- details (posologie)` line per treatment.
    pub traitements: String,
    pub dernier_controle: Option<VisitSummary>,
    pub avant_dernier_controle: Option<VisitSummary>,
    /// Set when the patient has visits and every one of them was cancelled.
    pub remarque: Option<String>,
    pub recommandations: String,
}

pub fn generate_medical_report(file: &PatientFile, today: NaiveDate) -> MedicalReport {
    let patient = &file.patient;
    let age = patient
        .age_on(today)
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let stade = patient
        .stade
        .map(|s| s.to_string())
        .unwrap_or_else(|| "non renseigné".to_string());

    let resume = format!(
        "Patient(e) {} {}, âgé(e) de {} ans, suivi(e) pour une maladie rénale chronique stade {}.",
        patient.prenom, patient.nom, age, stade
    );
    let numero_dossier = format!(
        "Dossier {}",
        patient.numero_dossier().unwrap_or("non attribué")
    );

    let antecedents = patient
        .antecedents
        .iter()
        .map(|a| format!("- {}", a.details))
        .collect::<Vec<_>>()
        .join("\n");
    let traitements = patient
        .traitements
        .iter()
        .map(|t| format!("- {} ({})", t.details, t.posologie))
        .collect::<Vec<_>>()
        .join("\n");

    let mut active = file
        .visites_newest_first()
        .into_iter()
        .filter(|v| v.is_active())
        .map(|v| VisitSummary {
            date: format_date_fr(&v.date),
            heure: v.heure.clone(),
            examens: v.examens.clone(),
            biologie: v.biologie.clone(),
            conclusion: if v.notes.trim().is_empty() {
                NO_CONCLUSION.to_string()
            } else {
                v.notes.clone()
            },
        });
    let dernier_controle = active.next();
    let avant_dernier_controle = active.next();

    let all_cancelled = !file.visites.is_empty() && dernier_controle.is_none();
    let recommandations = if dernier_controle.is_none() {
        PLAN_NEW_VISIT
    } else {
        STANDARD_FOLLOW_UP
    };

    MedicalReport {
        resume,
        numero_dossier,
        antecedents,
        traitements,
        dernier_controle,
        avant_dernier_controle,
        remarque: all_cancelled.then(|| ALL_CANCELLED.to_string()),
        recommandations: recommandations.to_string(),
    }
}
