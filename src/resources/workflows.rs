//! Care workflows: stage-bound templates of regular exams and alert rules.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ERROR_TITLE;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{lenient, Workflow, WorkflowInput};
use crate::store::{FetchOutcome, ResourceStore};
use crate::toast::{Notifier, Toast};

pub const FETCH_ERROR: &str = "Erreur lors de la récupération des workflows";
pub const FETCH_TOAST: &str = "Impossible de récupérer les workflows";
pub const CREATE_ERROR: &str = "Erreur lors de la création du workflow";
pub const UPDATE_ERROR: &str = "Erreur lors de la mise à jour du workflow";
pub const DELETE_ERROR: &str = "Erreur lors de la suppression du workflow";
pub const ASSIGN_ERROR: &str = "Erreur lors de l'assignation du workflow";

const SUCCESS_TITLE: &str = "Succès";

#[derive(Deserialize)]
struct WorkflowList {
    #[serde(default, deserialize_with = "lenient::vec")]
    workflows: Vec<Workflow>,
}

#[derive(Deserialize)]
struct WorkflowBody {
    workflow: Workflow,
}

#[derive(Serialize)]
struct Assignment {
    patient_id: u64,
}

#[derive(Clone)]
pub struct WorkflowsResource {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    store: Arc<ResourceStore<Workflow>>,
}

impl WorkflowsResource {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        store: Arc<ResourceStore<Workflow>>,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
        }
    }

    pub fn store(&self) -> &Arc<ResourceStore<Workflow>> {
        &self.store
    }

    pub fn items(&self) -> Vec<Workflow> {
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
            .get::<WorkflowList>("/api/workflows")
            .await
            .map(|body| body.workflows);

        if result.is_err() {
            self.notifier.notify(Toast::error(ERROR_TITLE, FETCH_TOAST));
        }
        self.store
            .finish_fetch(ticket, result.map_err(|_| FETCH_ERROR.to_string()))
    }

    pub async fn create(&self, input: &WorkflowInput) -> Result<Workflow, ClientError> {
        let body: WorkflowBody = self
            .api
            .post("/api/workflows", input)
            .await
            .inspect_err(|e| self.fail(e.message_or(CREATE_ERROR)))?;

        tracing::info!(id = body.workflow.id, "Workflow created");
        self.store.upsert(body.workflow.clone());
        self.succeed("Le workflow a été créé avec succès");
        Ok(body.workflow)
    }

    /// `PUT /api/workflows/:id`; the server copy replaces the local entry.
    pub async fn update(&self, id: u64, input: &WorkflowInput) -> Result<Workflow, ClientError> {
        let body: WorkflowBody = self
            .api
            .put(&format!("/api/workflows/{id}"), input)
            .await
            .inspect_err(|e| self.fail(e.message_or(UPDATE_ERROR)))?;

        tracing::info!(id, "Workflow updated");
        self.store.upsert(body.workflow.clone());
        self.succeed("Le workflow a été mis à jour avec succès");
        Ok(body.workflow)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.api
            .delete(&format!("/api/workflows/{id}"))
            .await
            .inspect_err(|e| self.fail(e.message_or(DELETE_ERROR)))?;

        tracing::info!(id, "Workflow deleted");
        self.store.remove(id);
        self.succeed("Le workflow a été supprimé avec succès");
        Ok(())
    }

    /// `POST /api/workflows/:id/assign`. Leaves the list untouched.
    pub async fn assign(&self, workflow_id: u64, patient_id: u64) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .api
            .post(
                &format!("/api/workflows/{workflow_id}/assign"),
                &Assignment { patient_id },
            )
            .await
            .inspect_err(|e| self.fail(e.message_or(ASSIGN_ERROR)))?;

        tracing::info!(workflow_id, patient_id, "Workflow assigned");
        self.succeed("Le workflow a été assigné au patient avec succès");
        Ok(())
    }

    /// Case-insensitive match on nom and description.
    pub fn search(&self, term: &str) -> Vec<Workflow> {
        self.store.search(term)
    }

    fn succeed(&self, description: &str) {
        self.notifier.notify(Toast::success(SUCCESS_TITLE, description));
    }

    fn fail(&self, message: String) {
        self.store.set_error(Some(message.clone()));
        self.notifier.notify(Toast::error(ERROR_TITLE, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegularExam;
    use crate::testing::MockBackend;

    fn input() -> WorkflowInput {
        WorkflowInput {
            nom: "Suivi stade 2".into(),
            description: "Contrôle semestriel".into(),
            stade: Some(2),
            examens_reguliers: RegularExam::new("Créatinine", "6 mois").into_iter().collect(),
            alertes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn fetch_parses_lenient_stade() {
        let backend = MockBackend::start().await;
        let (core, _) = backend.core();

        core.workflows().fetch().await;
        let items = core.workflows().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].stade, Some(4));
        assert_eq!(items[0].examens_reguliers[0].summary(), "Créatinine - Tous les 3 mois");
    }

    #[tokio::test]
    async fn failed_fetch_keeps_list() {
        let backend = MockBackend::start().await;
        let (core, toasts) = backend.core();
        core.workflows().fetch().await;
        backend.fail("GET /api/workflows", 503, serde_json::json!({}));

        assert_eq!(core.workflows().fetch().await, FetchOutcome::Failed);
        assert_eq!(core.workflows().items().len(), 2);
        assert_eq!(core.workflows().error().as_deref(), Some(FETCH_ERROR));
        assert_eq!(toasts.last().unwrap().description, FETCH_TOAST);
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let backend = MockBackend::start().await;
        let (core, toasts) = backend.core();
        let workflows = core.workflows();
        workflows.fetch().await;

        let created = workflows.create(&input()).await.unwrap();
        assert_eq!(workflows.items().len(), 3);
        assert_eq!(toasts.last().unwrap().description, "Le workflow a été créé avec succès");

        let mut edit = WorkflowInput::from_workflow(&created);
        edit.nom = "Suivi stade 2 renforcé".into();
        workflows.update(created.id, &edit).await.unwrap();
        assert_eq!(
            workflows.store().get(created.id).unwrap().nom,
            "Suivi stade 2 renforcé"
        );
        assert_eq!(workflows.items().len(), 3);

        workflows.delete(created.id).await.unwrap();
        assert_eq!(workflows.items().len(), 2);
        assert_eq!(toasts.last().unwrap().title, SUCCESS_TITLE);
    }

    #[tokio::test]
    async fn create_without_stade_reports_server_message() {
        let backend = MockBackend::start().await;
        let (core, toasts) = backend.core();
        let mut draft = input();
        draft.stade = None;

        let err = core.workflows().create(&draft).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            toasts.last().unwrap().description,
            "Les données fournies sont invalides."
        );
    }

    #[tokio::test]
    async fn assign_posts_patient_id() {
        let backend = MockBackend::start().await;
        let (core, toasts) = backend.core();

        core.workflows().assign(1, 12).await.unwrap();
        assert_eq!(
            backend.last_body("POST /api/workflows/1/assign"),
            Some(serde_json::json!({"patient_id": 12}))
        );
        assert_eq!(
            toasts.last().unwrap().description,
            "Le workflow a été assigné au patient avec succès"
        );

        core.workflows().assign(1, 999).await.unwrap_err();
        assert!(toasts.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn search_nom_and_description() {
        let backend = MockBackend::start().await;
        let (core, _) = backend.core();
        core.workflows().fetch().await;

        assert_eq!(core.workflows().search("  ").len(), 2);
        assert_eq!(core.workflows().search("dialyse").len(), 1);
        assert_eq!(core.workflows().search("TRIMESTRIELLE")[0].id, 1);
    }
}
