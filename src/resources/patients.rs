//! Patient list: `GET /api/patients/all`, create, delete, local search.

use std::sync::Arc;

use serde::Deserialize;

use super::GENERIC_ERROR;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{lenient, Patient, PatientInput};
use crate::store::{FetchOutcome, ResourceStore};

pub const DELETE_ERROR: &str = "Une erreur est survenue lors de la suppression";
pub const MISSING_FIELDS: &str = "Veuillez remplir tous les champs obligatoires";

#[derive(Deserialize)]
struct PatientList {
    #[serde(default, deserialize_with = "lenient::vec")]
    patients: Vec<Patient>,
}

#[derive(Deserialize)]
struct PatientBody {
    patient: Patient,
}

/// Shared handle on the patient list.
#[derive(Clone)]
pub struct PatientsResource {
    api: Arc<ApiClient>,
    store: Arc<ResourceStore<Patient>>,
}

impl PatientsResource {
    pub fn new(api: Arc<ApiClient>, store: Arc<ResourceStore<Patient>>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<ResourceStore<Patient>> {
        &self.store
    }

    pub fn items(&self) -> Vec<Patient> {
        self.store.items()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.store.error()
    }

    pub async fn fetch(&self) -> FetchOutcome {
        let ticket = self.store.begin_fetch();
        let result = self
            .api
            .get::<PatientList>("/api/patients/all")
            .await
            .map(|body| body.patients)
            .map_err(|e| e.message_or(GENERIC_ERROR));
        self.store.finish_fetch(ticket, result)
    }

    /// Create a patient; nom, prenom, date_naissance and numero_secu are required.
    pub async fn create(&self, input: &PatientInput) -> Result<Patient, ClientError> {
        check_new_patient(input)?;

        let body: PatientBody = self
            .api
            .post("/api/patients", input)
            .await
            .inspect_err(|e| self.store.set_error(Some(e.message_or(GENERIC_ERROR))))?;

        tracing::info!(id = body.patient.id, "Patient created");
        self.store.upsert(body.patient.clone());
        Ok(body.patient)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.api
            .delete(&format!("/api/patients/{id}"))
            .await
            .inspect_err(|e| self.store.set_error(Some(e.message_or(DELETE_ERROR))))?;

        tracing::info!(id, "Patient deleted");
        self.store.remove(id);
        Ok(())
    }

    /// Case-insensitive match on nom, prenom or numero_secu. Never hits the network.
    pub fn search(&self, term: &str) -> Vec<Patient> {
        self.store.search(term)
    }
}

fn check_new_patient(input: &PatientInput) -> Result<(), ClientError> {
    let required = [
        &input.nom,
        &input.prenom,
        &input.date_naissance,
        &input.numero_secu,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ClientError::validation(MISSING_FIELDS));
    }
    Ok(())
}
