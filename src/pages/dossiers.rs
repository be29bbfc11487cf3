//! Dossier list screen: search, status menu, link to the patient file.

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::core_state::CoreState;
use crate::models::{Dossier, DossierStatus};
use crate::resources::dossiers::STATUS_ERROR;
use crate::toast::Toast;

pub struct DossiersPage {
    core: Arc<CoreState>,
    /// `?patient=` from the URL, forwarded to the backend filter.
    patient_filter: Option<u64>,
    pub search: String,
    /// Dossier whose status change is in flight.
    updating: Option<u64>,
}

impl DossiersPage {
    pub fn new(core: Arc<CoreState>, patient_filter: Option<u64>) -> Self {
        Self {
            core,
            patient_filter,
            search: String::new(),
            updating: None,
        }
    }

    pub async fn load(&self) {
        self.core.dossiers().fetch(None, self.patient_filter).await;
    }

    pub fn visible(&self) -> Vec<Dossier> {
        self.core.dossiers().search(&self.search)
    }

    pub fn updating(&self) -> Option<u64> {
        self.updating
    }

    /// Menu entries for the current status are disabled, as is everything
    /// while another change runs.
    pub fn can_set_status(&self, dossier: &Dossier, status: DossierStatus) -> bool {
        self.updating.is_none() && dossier.status != status
    }

    pub async fn set_status(&mut self, id: u64, status: DossierStatus) -> bool {
        let Some(dossier) = self.core.dossiers().store().get(id) else {
            return false;
        };
        if !self.can_set_status(&dossier, status) {
            return false;
        }

        self.updating = Some(id);
        let result = self.core.dossiers().update_status(id, status).await;
        self.updating = None;

        match result {
            Ok(()) => {
                self.core.notify(Toast::success(
                    "Statut mis à jour",
                    format!("Le statut du dossier a été changé en {}", status.label()),
                ));
                true
            }
            Err(e) => {
                self.core
                    .notify(Toast::error(ERROR_TITLE, e.message_or(STATUS_ERROR)));
                false
            }
        }
    }

    /// The patient file behind a dossier. Falls back to the dossier id when
    /// the payload carries no patient.
    pub fn consult_link(dossier: &Dossier) -> String {
        let id = dossier
            .patient
            .as_ref()
            .and_then(|p| p.id)
            .unwrap_or(dossier.id);
        format!("/dossiers/{id}")
    }

    /// Dates as `dd/MM/yyyy`, "Date invalide" when unparsable.
    pub fn format_date(raw: &str) -> String {
        match crate::models::parse_date(raw) {
            Some(date) => date.format("%d/%m/%Y").to_string(),
            None => "Date invalide".to_string(),
        }
    }
}
