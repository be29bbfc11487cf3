//! Dossier list, single dossier lookup and status changes.
//!
//! The list is shared: a fetch filtered by `patient_id` replaces whatever
//! another screen fetched before. Last fetch wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GENERIC_ERROR;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{lenient, Dossier, DossierStatus};
use crate::store::{FetchOutcome, ResourceStore};

pub const STATUS_ERROR: &str = "Une erreur est survenue lors de la mise à jour du statut";

/// Paginated envelope: `{dossiers: {data: [...], current_page, ...}}`.
#[derive(Deserialize)]
struct DossierPage {
    #[serde(default, deserialize_with = "lenient::vec")]
    data: Vec<Dossier>,
}

#[derive(Deserialize)]
struct DossierList {
    dossiers: DossierPage,
}

#[derive(Deserialize)]
struct DossierBody {
    dossier: Dossier,
}

#[derive(Serialize)]
struct StatusBody {
    status: DossierStatus,
}

#[derive(Clone)]
pub struct DossiersResource {
    api: Arc<ApiClient>,
    store: Arc<ResourceStore<Dossier>>,
}

impl DossiersResource {
    pub fn new(api: Arc<ApiClient>, store: Arc<ResourceStore<Dossier>>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<ResourceStore<Dossier>> {
        &self.store
    }

    pub fn items(&self) -> Vec<Dossier> {
        self.store.items()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.store.error()
    }

    /// `GET /api/dossiers`, optionally filtered server-side.
    pub async fn fetch(&self, search: Option<&str>, patient_id: Option<u64>) -> FetchOutcome {
        let query = [
            ("search", search.unwrap_or_default().trim().to_string()),
            (
                "patient_id",
                patient_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
        ];

        let ticket = self.store.begin_fetch();
        let result = self
            .api
            .get_with_query::<DossierList>("/api/dossiers", &query)
            .await
            .map(|body| body.dossiers.data)
            .map_err(|e| e.message_or(GENERIC_ERROR));
        self.store.finish_fetch(ticket, result)
    }

    /// `GET /api/dossiers/:id`. Does not touch the list.
    pub async fn get(&self, id: u64) -> Result<Dossier, ClientError> {
        self.api
            .get::<DossierBody>(&format!("/api/dossiers/{id}"))
            .await
            .map(|body| body.dossier)
    }

    /// `PATCH /api/dossiers/:id/status`, then patch status and `updated_at` locally.
    pub async fn update_status(&self, id: u64, status: DossierStatus) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .api
            .patch(&format!("/api/dossiers/{id}/status"), &StatusBody { status })
            .await
            .inspect_err(|e| self.store.set_error(Some(e.message_or(STATUS_ERROR))))?;

        tracing::info!(id, status = %status, "Dossier status updated");
        let now = chrono::Utc::now().to_rfc3339();
        self.store.update_with(id, |dossier| {
            dossier.status = status;
            dossier.updated_at = now;
        });
        Ok(())
    }

    /// Case-insensitive match on numero_dossier and patient nom / prenom.
    pub fn search(&self, term: &str) -> Vec<Dossier> {
        self.store.search(term)
    }
}
