//! Workflow editor: list, create/edit dialog, assignment to a patient.

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::busy::ActionFlag;
use crate::core_state::CoreState;
use crate::models::{AlertRule, Patient, RegularExam, Workflow, WorkflowInput};
use crate::toast::Toast;

pub const EXAM_INCOMPLETE: &str = "Veuillez remplir tous les champs de l'examen";
pub const ALERT_INCOMPLETE: &str = "Veuillez remplir tous les champs de l'alerte";
pub const NAME_AND_STAGE_REQUIRED: &str = "Le nom et le stade sont requis";
pub const PATIENT_REQUIRED: &str = "Veuillez sélectionner un patient";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamDraft {
    pub kind: String,
    pub frequence: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertDraft {
    pub indicateur: String,
    pub condition: String,
    pub message: String,
}

pub struct WorkflowsPage {
    core: Arc<CoreState>,
    pub search: String,

    pub dialog_open: bool,
    pub form: WorkflowInput,
    /// `Some(id)` when the dialog edits an existing workflow.
    editing: Option<u64>,
    pub exam: ExamDraft,
    pub alert: AlertDraft,

    /// Workflow being assigned, and the patient picked for it.
    assigning: Option<u64>,
    pub assign_patient: Option<u64>,

    saving: ActionFlag,
    deleting: ActionFlag,
    assigning_flag: ActionFlag,
}

impl WorkflowsPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            search: String::new(),
            dialog_open: false,
            form: WorkflowInput::default(),
            editing: None,
            exam: ExamDraft::default(),
            alert: AlertDraft::default(),
            assigning: None,
            assign_patient: None,
            saving: ActionFlag::new(),
            deleting: ActionFlag::new(),
            assigning_flag: ActionFlag::new(),
        }
    }

    pub async fn load(&self) {
        self.core.workflows().fetch().await;
    }

    pub fn visible(&self) -> Vec<Workflow> {
        self.core.workflows().search(&self.search)
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_running()
    }

    // ── Dialog ──────────────────────────────────────────────

    pub fn open_new(&mut self) {
        self.reset();
        self.dialog_open = true;
    }

    pub fn open_edit(&mut self, id: u64) -> bool {
        let Some(workflow) = self.core.workflows().store().get(id) else {
            return false;
        };
        self.reset();
        self.form = WorkflowInput::from_workflow(&workflow);
        self.editing = Some(id);
        self.dialog_open = true;
        true
    }

    pub fn close(&mut self) {
        self.reset();
    }

    pub fn add_exam(&mut self) -> bool {
        match RegularExam::new(&self.exam.kind, &self.exam.frequence) {
            Some(exam) => {
                self.form.examens_reguliers.push(exam);
                self.exam = ExamDraft::default();
                true
            }
            None => {
                self.core.notify(Toast::error(ERROR_TITLE, EXAM_INCOMPLETE));
                false
            }
        }
    }

    pub fn remove_exam(&mut self, index: usize) {
        if index < self.form.examens_reguliers.len() {
            self.form.examens_reguliers.remove(index);
        }
    }

    pub fn add_alert(&mut self) -> bool {
        let draft = &self.alert;
        match AlertRule::new(&draft.indicateur, &draft.condition, &draft.message) {
            Some(rule) => {
                self.form.alertes.push(rule);
                self.alert = AlertDraft::default();
                true
            }
            None => {
                self.core.notify(Toast::error(ERROR_TITLE, ALERT_INCOMPLETE));
                false
            }
        }
    }

    pub fn remove_alert(&mut self, index: usize) {
        if index < self.form.alertes.len() {
            self.form.alertes.remove(index);
        }
    }

    /// Create or update depending on how the dialog was opened.
    pub async fn save(&mut self) -> bool {
        if self.form.nom.trim().is_empty() || self.form.stade.is_none() {
            self.core
                .notify(Toast::error(ERROR_TITLE, NAME_AND_STAGE_REQUIRED));
            return false;
        }

        let saved = {
            let Some(_running) = self.saving.try_start() else {
                return false;
            };
            match self.editing {
                Some(id) => self.core.workflows().update(id, &self.form).await,
                None => self.core.workflows().create(&self.form).await,
            }
        };
        if saved.is_err() {
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.form = WorkflowInput::default();
        self.editing = None;
        self.exam = ExamDraft::default();
        self.alert = AlertDraft::default();
        self.dialog_open = false;
    }

    pub async fn delete(&self, id: u64) -> bool {
        let Some(_running) = self.deleting.try_start() else {
            return false;
        };
        self.core.workflows().delete(id).await.is_ok()
    }

    // ── Assignment ──────────────────────────────────────────

    /// Open the assignment dialog; loads the patient list when empty.
    pub async fn open_assign(&mut self, workflow_id: u64) {
        self.assigning = Some(workflow_id);
        self.assign_patient = None;
        if self.core.patients().store().is_empty() {
            self.core.patients().fetch().await;
        }
    }

    pub fn assigning(&self) -> Option<u64> {
        self.assigning
    }

    pub fn assignable_patients(&self) -> Vec<Patient> {
        self.core.patients().store().items()
    }

    pub async fn assign(&mut self) -> bool {
        let Some(workflow_id) = self.assigning else {
            return false;
        };
        let Some(patient_id) = self.assign_patient else {
            self.core.notify(Toast::error(ERROR_TITLE, PATIENT_REQUIRED));
            return false;
        };

        let result = {
            let Some(_running) = self.assigning_flag.try_start() else {
                return false;
            };
            self.core.workflows().assign(workflow_id, patient_id).await
        };
        if result.is_err() {
            return false;
        }
        self.assigning = None;
        self.assign_patient = None;
        true
    }
}
