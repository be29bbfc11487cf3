//! Doctor accounts, managed from the admin page.
//!
//! The backend stores a single `name` ("Nom Prénom"); the admin table shows
//! nom and prenom separately, so records are mapped to `Doctor` on arrival.
//! Every operation reports its outcome with a toast.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ERROR_TITLE;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{lenient, ApiMedecin, Doctor, DoctorInput, MedecinPayload};
use crate::store::{FetchOutcome, ResourceStore};
use crate::toast::{Notifier, Toast};

pub const FETCH_ERROR: &str = "Impossible de récupérer la liste des médecins";
pub const CREATE_ERROR: &str = "Impossible d'ajouter le médecin";
pub const UPDATE_ERROR: &str = "Impossible de mettre à jour le médecin";
pub const DELETE_ERROR: &str = "Impossible de supprimer le médecin";
pub const DELETE_HAS_PATIENTS: &str =
    "Impossible de supprimer ce médecin car il a des patients associés";
pub const PASSWORD_ERROR: &str = "Impossible de mettre à jour le mot de passe";

#[derive(Deserialize)]
struct MedecinList {
    #[serde(default, deserialize_with = "lenient::vec")]
    medecins: Vec<ApiMedecin>,
}

#[derive(Deserialize)]
struct MedecinCreated {
    medecin: CreatedId,
}

#[derive(Deserialize)]
struct CreatedId {
    #[serde(deserialize_with = "lenient::id")]
    id: u64,
}

#[derive(Serialize)]
struct NewPassword<'a> {
    password: &'a str,
    password_confirmation: &'a str,
}

#[derive(Clone)]
pub struct AdminResource {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    store: Arc<ResourceStore<Doctor>>,
}

impl AdminResource {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        store: Arc<ResourceStore<Doctor>>,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
        }
    }

    pub fn store(&self) -> &Arc<ResourceStore<Doctor>> {
        &self.store
    }

    pub fn items(&self) -> Vec<Doctor> {
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
            .get::<MedecinList>("/api/admin/medecins")
            .await
            .map(|body| body.medecins.into_iter().map(Doctor::from).collect());

        if result.is_err() {
            self.notifier.notify(Toast::error(ERROR_TITLE, FETCH_ERROR));
        }
        self.store
            .finish_fetch(ticket, result.map_err(|_| FETCH_ERROR.to_string()))
    }

    /// `POST /api/admin/medecins`; the new doctor is appended with today's date.
    pub async fn add(&self, input: &DoctorInput) -> Result<Doctor, ClientError> {
        let created: MedecinCreated = self
            .api
            .post("/api/admin/medecins", &MedecinPayload::create(input))
            .await
            .inspect_err(|e| self.report(e.detail_or(CREATE_ERROR)))?;

        let today = chrono::Local::now().date_naive();
        let doctor = Doctor::from_input(created.medecin.id, input, today);
        tracing::info!(id = doctor.id, "Doctor account created");
        self.store.upsert(doctor.clone());
        self.notifier.notify(Toast::success(
            "Médecin ajouté",
            "Le nouveau médecin a été enregistré avec succès",
        ));
        Ok(doctor)
    }

    /// `PUT /api/admin/medecins/:id`; the password is never sent here.
    pub async fn update(&self, id: u64, input: &DoctorInput) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .api
            .put(
                &format!("/api/admin/medecins/{id}"),
                &MedecinPayload::update(input),
            )
            .await
            .inspect_err(|e| self.report(e.message_or(UPDATE_ERROR)))?;

        tracing::info!(id, "Doctor account updated");
        self.store.update_with(id, |doctor| {
            doctor.nom = input.nom.trim().to_string();
            doctor.prenom = input.prenom.trim().to_string();
            doctor.email = input.email.trim().to_string();
            doctor.specialite = input.specialite.clone();
        });
        self.notifier.notify(Toast::success(
            "Médecin modifié",
            "Les informations ont été mises à jour avec succès",
        ));
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.api
            .delete(&format!("/api/admin/medecins/{id}"))
            .await
            .inspect_err(|e| self.report(delete_message(e).to_string()))?;

        tracing::info!(id, "Doctor account deleted");
        self.store.remove(id);
        self.notifier.notify(Toast::success(
            "Médecin supprimé",
            "Le médecin a été supprimé avec succès",
        ));
        Ok(())
    }

    /// `PUT /api/admin/medecins/:id/password`. The dialog checks that both
    /// fields are filled and equal before calling this.
    pub async fn update_password(
        &self,
        id: u64,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ClientError> {
        let body = NewPassword {
            password,
            password_confirmation: confirmation,
        };
        let _: serde_json::Value = self
            .api
            .put(&format!("/api/admin/medecins/{id}/password"), &body)
            .await
            .inspect_err(|e| self.report(e.message_or(PASSWORD_ERROR)))?;

        tracing::info!(id, "Doctor password reset");
        self.notifier.notify(Toast::success(
            "Mot de passe modifié",
            "Le mot de passe a été mis à jour avec succès",
        ));
        Ok(())
    }

    /// Pure filter on nom, prenom, email and specialite.
    pub fn search(&self, term: &str) -> Vec<Doctor> {
        self.store.search(term)
    }

    fn report(&self, message: String) {
        self.notifier.notify(Toast::error(ERROR_TITLE, message));
    }
}

/// A 400 mentioning patients means the doctor still follows some.
fn delete_message(err: &ClientError) -> &'static str {
    match err {
        ClientError::Server {
            status: 400,
            message: Some(message),
            ..
        } if message.contains("patients") => DELETE_HAS_PATIENTS,
        _ => DELETE_ERROR,
    }
}
