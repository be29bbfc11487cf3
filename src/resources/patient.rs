//! Single patient file: the patient record plus its visit history.
//!
//! Backs the dossier detail screen. `load()` fetches `GET /api/patients/:id`
//! then `GET /api/patients/:id/visites`; every mutation (patient update,
//! visit create / update / cancel) is followed by a `load()` from the
//! caller. Only the most recent `load()` may replace the shown file, so
//! switching quickly between two patients never shows the first one last.
//!
//! Visit status changes are checked here against `VisiteStatus::can_transition_to`
//! before anything is sent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GENERIC_ERROR;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{
    Patient, PatientInput, Prescription, ResultLine, Visite, VisiteInput, VisiteStatus,
};
use crate::store::{ResourceStore, Slot};

pub const MISSING_PATIENT_FIELDS: &str = "Veuillez remplir tous les champs obligatoires";
pub const MISSING_VISIT_FIELDS: &str =
    "Veuillez remplir au moins le médecin et le motif de la visite";
pub const CANCELLED_VISIT: &str = "Une visite annulée ne peut plus être modifiée";
pub const FORBIDDEN_TRANSITION: &str = "Ce changement de statut n'est pas autorisé";
pub const UNKNOWN_VISIT: &str = "Visite introuvable dans ce dossier";

/// `GET /api/patients/:id` answers with the bare record; `{patient}` is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum PatientBody {
    Wrapped { patient: Patient },
    Bare(Patient),
}

impl PatientBody {
    fn into_inner(self) -> Patient {
        match self {
            Self::Wrapped { patient } | Self::Bare(patient) => patient,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VisitesBody {
    Bare(Vec<Visite>),
    Wrapped { visites: Vec<Visite> },
}

impl VisitesBody {
    fn into_inner(self) -> Vec<Visite> {
        match self {
            Self::Bare(visites) | Self::Wrapped { visites } => visites,
        }
    }
}

#[derive(Serialize)]
struct StatusOnly {
    status: VisiteStatus,
}

// ═══════════════════════════════════════════════════════════
// PatientFile — derived views over one patient's history
// ═══════════════════════════════════════════════════════════

/// A patient with its complete visit history, cancelled visits included.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFile {
    pub patient: Patient,
    pub visites: Vec<Visite>,
}

impl PatientFile {
    pub fn visite(&self, id: u64) -> Option<&Visite> {
        self.visites.iter().find(|v| v.id == id)
    }

    /// Visits that are not cancelled, in server order.
    pub fn active_visites(&self) -> Vec<&Visite> {
        self.visites.iter().filter(|v| v.is_active()).collect()
    }

    pub fn all_examens(&self) -> Vec<&ResultLine> {
        self.active_visites()
            .into_iter()
            .flat_map(|v| v.examens.iter())
            .collect()
    }

    pub fn all_biologie(&self) -> Vec<&ResultLine> {
        self.active_visites()
            .into_iter()
            .flat_map(|v| v.biologie.iter())
            .collect()
    }

    pub fn all_prescriptions(&self) -> Vec<&Prescription> {
        self.active_visites()
            .into_iter()
            .flat_map(|v| v.prescriptions.iter())
            .collect()
    }

    /// Every visit sorted by date then time, newest first.
    pub fn visites_newest_first(&self) -> Vec<&Visite> {
        let mut visites: Vec<&Visite> = self.visites.iter().collect();
        visites.sort_by(|a, b| b.when().cmp(&a.when()));
        visites
    }
}

// ═══════════════════════════════════════════════════════════
// PatientResource
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PatientResource {
    api: Arc<ApiClient>,
    file: Arc<Slot<PatientFile>>,
    /// List store, kept in step when a patient is edited here.
    list: Arc<ResourceStore<Patient>>,
    latest_load: Arc<AtomicU64>,
}

impl PatientResource {
    pub fn new(
        api: Arc<ApiClient>,
        file: Arc<Slot<PatientFile>>,
        list: Arc<ResourceStore<Patient>>,
    ) -> Self {
        Self {
            api,
            file,
            list,
            latest_load: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn slot(&self) -> &Arc<Slot<PatientFile>> {
        &self.file
    }

    /// The file currently shown, if loaded.
    pub fn file(&self) -> Option<PatientFile> {
        self.file.get()
    }

    pub fn is_loading(&self) -> bool {
        self.file.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.file.error()
    }

    pub async fn get_patient(&self, id: u64) -> Result<Patient, ClientError> {
        self.api
            .get::<PatientBody>(&format!("/api/patients/{id}"))
            .await
            .map(PatientBody::into_inner)
    }

    pub async fn get_visites(&self, patient_id: u64) -> Result<Vec<Visite>, ClientError> {
        self.api
            .get::<VisitesBody>(&format!("/api/patients/{patient_id}/visites"))
            .await
            .map(VisitesBody::into_inner)
    }

    /// Fetch patient and visits, then show them unless a newer load started meanwhile.
    pub async fn load(&self, id: u64) -> Result<PatientFile, ClientError> {
        let seq = self.latest_load.fetch_add(1, Ordering::AcqRel) + 1;
        self.file.begin();

        let result = async {
            let patient = self.get_patient(id).await?;
            let visites = self.get_visites(id).await?;
            Ok::<_, ClientError>(PatientFile { patient, visites })
        }
        .await;

        let current = self.latest_load.load(Ordering::Acquire) == seq;
        match &result {
            Ok(file) if current => self.file.finish(Ok(Some(file.clone()))),
            Ok(_) => {
                tracing::debug!(id, "Dropped superseded patient load");
                self.file.finish(Ok(None));
            }
            Err(e) if current => self.file.finish(Err(e.message_or(GENERIC_ERROR))),
            Err(_) => self.file.finish(Ok(None)),
        }
        result
    }

    /// `PUT /api/patients/:id`; nom, prenom and date_naissance are required.
    pub async fn update_patient(&self, id: u64, input: &PatientInput) -> Result<(), ClientError> {
        let required = [&input.nom, &input.prenom, &input.date_naissance];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(ClientError::validation(MISSING_PATIENT_FIELDS));
        }

        let _: serde_json::Value = self
            .api
            .put(&format!("/api/patients/{id}"), input)
            .await
            .inspect_err(|e| self.fail(e))?;

        tracing::info!(id, "Patient updated");
        self.list.update_with(id, |p| apply_input(p, input));
        Ok(())
    }

    /// `POST /api/visites`; medecin and motif are required.
    pub async fn create_visite(&self, input: &VisiteInput) -> Result<(), ClientError> {
        if input.medecin.trim().is_empty() || input.motif.trim().is_empty() {
            return Err(ClientError::validation(MISSING_VISIT_FIELDS));
        }

        let _: serde_json::Value = self
            .api
            .post("/api/visites", input)
            .await
            .inspect_err(|e| self.fail(e))?;
        tracing::info!(patient_id = input.patient_id, "Visit created");
        Ok(())
    }

    /// `PUT /api/visites/:id` with the full draft.
    ///
    /// Refused when the visit is cancelled or when the new status is not
    /// reachable from the current one.
    pub async fn update_visite(&self, id: u64, input: &VisiteInput) -> Result<(), ClientError> {
        self.check_transition(id, input.status)?;

        let _: serde_json::Value = self
            .api
            .put(&format!("/api/visites/{id}"), input)
            .await
            .inspect_err(|e| self.fail(e))?;
        tracing::info!(id, status = %input.status, "Visit updated");
        Ok(())
    }

    /// Mark a visit `annulé`. Irreversible.
    pub async fn cancel_visite(&self, id: u64) -> Result<(), ClientError> {
        self.check_transition(id, VisiteStatus::Annule)?;

        let body = StatusOnly {
            status: VisiteStatus::Annule,
        };
        let _: serde_json::Value = self
            .api
            .put(&format!("/api/visites/{id}"), &body)
            .await
            .inspect_err(|e| self.fail(e))?;
        tracing::info!(id, "Visit cancelled");
        Ok(())
    }

    fn check_transition(&self, id: u64, next: VisiteStatus) -> Result<(), ClientError> {
        let file = self
            .file
            .get()
            .ok_or_else(|| ClientError::validation(UNKNOWN_VISIT))?;
        let current = file
            .visite(id)
            .ok_or_else(|| ClientError::validation(UNKNOWN_VISIT))?
            .status;

        if current.is_cancelled() {
            return Err(ClientError::validation(CANCELLED_VISIT));
        }
        if !current.can_transition_to(next) {
            return Err(ClientError::validation(FORBIDDEN_TRANSITION));
        }
        Ok(())
    }

    fn fail(&self, err: &ClientError) {
        self.file.set_error(Some(err.message_or(GENERIC_ERROR)));
    }
}

fn apply_input(patient: &mut Patient, input: &PatientInput) {
    let opt = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    patient.nom = input.nom.clone();
    patient.prenom = input.prenom.clone();
    patient.date_naissance = input.date_naissance.clone();
    patient.sexe = opt(&input.sexe);
    patient.adresse = opt(&input.adresse);
    patient.telephone = opt(&input.telephone);
    patient.email = opt(&input.email);
    patient.numero_secu = input.numero_secu.clone();
    patient.medecin_referent = opt(&input.medecin_referent);
    patient.stade = input.stade;
}
