//! Application state shared by every screen.
//!
//! `CoreState` is built once at startup and wrapped in `Arc`. It owns the
//! HTTP client, the toast sink, the session and one store per resource, so
//! two screens reading patients always read the same list. Resource handles
//! returned by the accessors are cheap clones over those shared stores.

use std::sync::{Arc, RwLock};

use crate::auth::AuthSession;
use crate::config::{self, ClientConfig};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{DashboardData, Doctor, Dossier, MedecinProfile, Patient, Theme, Workflow};
use crate::resources::{
    AdminResource, DashboardResource, DossiersResource, MedecinResource, PatientFile,
    PatientResource, PatientsResource, WorkflowsResource,
};
use crate::store::{ResourceStore, Slot};
use crate::toast::{Notifier, Toast, TracingNotifier};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    auth: AuthSession,
    patients: PatientsResource,
    patient: PatientResource,
    dossiers: DossiersResource,
    admin: AdminResource,
    medecin: MedecinResource,
    workflows: WorkflowsResource,
    dashboard: DashboardResource,
    /// Display theme chosen on the settings page.
    theme: RwLock<Theme>,
}

impl CoreState {
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::new(config)?);

        let patient_list = Arc::new(ResourceStore::<Patient>::new("patients"));
        let patient_file = Arc::new(Slot::<PatientFile>::new("patient"));
        let dossier_list = Arc::new(ResourceStore::<Dossier>::new("dossiers"));
        let doctor_list = Arc::new(ResourceStore::<Doctor>::new("medecins"));
        let profile = Arc::new(Slot::<MedecinProfile>::new("profil"));
        let workflow_list = Arc::new(ResourceStore::<Workflow>::new("workflows"));
        let dashboard = Arc::new(Slot::<DashboardData>::new("dashboard"));

        tracing::info!(
            app = config::APP_NAME,
            version = config::APP_VERSION,
            base_url = api.base_url(),
            "Client state ready"
        );

        Ok(Self {
            auth: AuthSession::new(Arc::clone(&api)),
            patients: PatientsResource::new(Arc::clone(&api), Arc::clone(&patient_list)),
            patient: PatientResource::new(Arc::clone(&api), patient_file, patient_list),
            dossiers: DossiersResource::new(Arc::clone(&api), dossier_list),
            admin: AdminResource::new(Arc::clone(&api), Arc::clone(&notifier), doctor_list),
            medecin: MedecinResource::new(Arc::clone(&api), Arc::clone(&notifier), profile),
            workflows: WorkflowsResource::new(
                Arc::clone(&api),
                Arc::clone(&notifier),
                workflow_list,
            ),
            dashboard: DashboardResource::new(Arc::clone(&api), Arc::clone(&notifier), dashboard),
            theme: RwLock::new(Theme::System),
            api,
            notifier,
        })
    }

    /// Configuration from the environment, toasts sent to the log.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::from_env(), Arc::new(TracingNotifier))
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn notify(&self, toast: Toast) {
        self.notifier.notify(toast);
    }

    // ── Session ─────────────────────────────────────────────

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    // ── Resources ───────────────────────────────────────────

    pub fn patients(&self) -> &PatientsResource {
        &self.patients
    }

    pub fn patient(&self) -> &PatientResource {
        &self.patient
    }

    pub fn dossiers(&self) -> &DossiersResource {
        &self.dossiers
    }

    pub fn admin(&self) -> &AdminResource {
        &self.admin
    }

    pub fn medecin(&self) -> &MedecinResource {
        &self.medecin
    }

    pub fn workflows(&self) -> &WorkflowsResource {
        &self.workflows
    }

    pub fn dashboard(&self) -> &DashboardResource {
        &self.dashboard
    }

    // ── Preferences ─────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        self.theme.read().map(|t| *t).unwrap_or(Theme::System)
    }

    pub fn set_theme(&self, theme: Theme) {
        match self.theme.write() {
            Ok(mut current) => *current = theme,
            Err(poisoned) => *poisoned.into_inner() = theme,
        }
        tracing::debug!(theme = %theme, "Theme changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crate::toast::ToastLog;

    #[tokio::test]
    async fn screens_share_one_store_per_resource() {
        let backend = MockBackend::start().await;
        let (core, _) = backend.core();

        let list_view = core.patients().clone();
        let other_view = core.patients().clone();
        list_view.fetch().await;

        assert_eq!(other_view.items().len(), 3);
        assert!(Arc::ptr_eq(list_view.store(), other_view.store()));
    }

    #[tokio::test]
    async fn patient_edit_reaches_list_store() {
        let backend = MockBackend::start().await;
        let (core, _) = backend.core();
        core.patients().fetch().await;
        let mut rx = core.patients().store().subscribe();
        rx.borrow_and_update();

        let file = core.patient().load(13).await.unwrap();
        let mut input = crate::models::PatientInput::from_patient(&file.patient);
        input.adresse = "12 avenue Jean Jaurès, Lyon".into();
        core.patient().update_patient(13, &input).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            core.patients().store().get(13).unwrap().adresse.as_deref(),
            Some("12 avenue Jean Jaurès, Lyon")
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let config = ClientConfig::new("pas une url");
        let result = CoreState::new(&config, Arc::new(ToastLog::new()));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn theme_defaults_to_system() {
        let core = CoreState::new(&ClientConfig::default(), Arc::new(ToastLog::new())).unwrap();
        assert_eq!(core.theme(), Theme::System);
        core.set_theme(Theme::Dark);
        assert_eq!(core.theme(), Theme::Dark);
    }

    #[test]
    fn notify_goes_to_configured_sink() {
        let toasts = Arc::new(ToastLog::new());
        let core = CoreState::new(&ClientConfig::default(), toasts.clone()).unwrap();
        core.notify(Toast::success("Thème modifié", "Le thème dark a été appliqué"));
        assert_eq!(toasts.len(), 1);
    }
}
