//! Dashboard aggregates (`GET /api/dashboard`).

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::DashboardData;
use crate::store::Slot;
use crate::toast::{Notifier, Toast};

pub const FETCH_ERROR: &str = "Erreur lors de la récupération des données du dashboard";

#[derive(Clone)]
pub struct DashboardResource {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    data: Arc<Slot<DashboardData>>,
}

impl DashboardResource {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        data: Arc<Slot<DashboardData>>,
    ) -> Self {
        Self {
            api,
            notifier,
            data,
        }
    }

    pub fn slot(&self) -> &Arc<Slot<DashboardData>> {
        &self.data
    }

    /// Last loaded aggregates, or the all-zero default before the first load.
    pub fn data(&self) -> DashboardData {
        self.data.get().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.data.error()
    }

    pub async fn fetch(&self) -> Result<DashboardData, ClientError> {
        self.data.begin();
        match self.api.get::<DashboardData>("/api/dashboard").await {
            Ok(data) => {
                tracing::debug!(patients = data.patients.total, "Dashboard loaded");
                self.data.finish(Ok(Some(data.clone())));
                Ok(data)
            }
            Err(e) => {
                let message = e.message_or(FETCH_ERROR);
                self.notifier.notify(Toast::error(ERROR_TITLE, &message));
                self.data.finish(Err(message));
                Err(e)
            }
        }
    }
}
