//! Patient list screen with the intake dialog.

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::busy::ActionFlag;
use crate::core_state::CoreState;
use crate::models::{
    Antecedent, AntecedentCategory, Patient, PatientInput, Traitement, TreatmentCategory,
};
use crate::resources::GENERIC_ERROR;
use crate::toast::Toast;

pub const VALIDATION_TITLE: &str = "Erreur de validation";
pub const MISSING_FIELDS: &str = "Veuillez remplir tous les champs obligatoires";
pub const ANTECEDENT_INCOMPLETE: &str = "Veuillez sélectionner une catégorie et saisir les détails";
pub const TREATMENT_INCOMPLETE: &str = "Veuillez remplir tous les champs du traitement";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntecedentDraft {
    pub categorie: Option<AntecedentCategory>,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreatmentDraft {
    pub categorie: Option<TreatmentCategory>,
    pub details: String,
    pub posologie: String,
}

pub struct PatientsPage {
    core: Arc<CoreState>,
    pub search: String,
    pub dialog_open: bool,
    /// Intake form. Its lists are built from `antecedents` / `traitements`.
    pub form: PatientInput,
    pub antecedents: Vec<Antecedent>,
    pub traitements: Vec<Traitement>,
    pub antecedent: AntecedentDraft,
    pub traitement: TreatmentDraft,
    submitting: ActionFlag,
    deleting: ActionFlag,
}

impl PatientsPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            search: String::new(),
            dialog_open: false,
            form: PatientInput::default(),
            antecedents: Vec::new(),
            traitements: Vec::new(),
            antecedent: AntecedentDraft::default(),
            traitement: TreatmentDraft::default(),
            submitting: ActionFlag::new(),
            deleting: ActionFlag::new(),
        }
    }

    pub async fn load(&self) {
        self.core.patients().fetch().await;
    }

    /// Rows matching the search box.
    pub fn visible(&self) -> Vec<Patient> {
        self.core.patients().search(&self.search)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_running()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_running()
    }

    /// Link of the "Dossier" button.
    pub fn dossier_link(patient_id: u64) -> String {
        format!("/dossiers?patient={patient_id}")
    }

    // ── Intake lists ────────────────────────────────────────

    pub fn add_antecedent(&mut self) -> bool {
        let details = self.antecedent.details.trim();
        let Some(category) = self.antecedent.categorie.filter(|_| !details.is_empty()) else {
            self.core
                .notify(Toast::error(ERROR_TITLE, ANTECEDENT_INCOMPLETE));
            return false;
        };
        self.antecedents.push(Antecedent::new(category, details));
        self.antecedent = AntecedentDraft::default();
        true
    }

    /// Remove the entry at `index`; out-of-range indexes are ignored.
    pub fn remove_antecedent(&mut self, index: usize) {
        if index < self.antecedents.len() {
            self.antecedents.remove(index);
        }
    }

    pub fn add_treatment(&mut self) -> bool {
        let draft = &self.traitement;
        let complete = !draft.details.trim().is_empty() && !draft.posologie.trim().is_empty();
        let Some(category) = draft.categorie.filter(|_| complete) else {
            self.core.notify(Toast::error(ERROR_TITLE, TREATMENT_INCOMPLETE));
            return false;
        };
        self.traitements.push(Traitement::new(
            category,
            draft.details.trim(),
            draft.posologie.trim(),
        ));
        self.traitement = TreatmentDraft::default();
        true
    }

    pub fn remove_treatment(&mut self, index: usize) {
        if index < self.traitements.len() {
            self.traitements.remove(index);
        }
    }

    // ── Submit / delete ─────────────────────────────────────

    /// Create the patient. On success the form is reset and the dialog closed.
    pub async fn submit(&mut self) -> bool {
        let required = [
            &self.form.nom,
            &self.form.prenom,
            &self.form.date_naissance,
            &self.form.numero_secu,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            self.core
                .notify(Toast::error(VALIDATION_TITLE, MISSING_FIELDS));
            return false;
        }

        let Some(_running) = self.submitting.try_start() else {
            return false;
        };

        let input = PatientInput {
            antecedents: Some(self.antecedents.clone()),
            traitements: Some(self.traitements.clone()),
            ..self.form.clone()
        };
        match self.core.patients().create(&input).await {
            Ok(_) => {
                self.form = PatientInput::default();
                self.antecedents.clear();
                self.traitements.clear();
                self.dialog_open = false;
                self.core.notify(Toast::success(
                    "Patient ajouté",
                    "Le nouveau patient a été enregistré avec succès",
                ));
                true
            }
            Err(e) => {
                self.core
                    .notify(Toast::error(ERROR_TITLE, e.detail_or(GENERIC_ERROR)));
                false
            }
        }
    }

    pub async fn delete(&self, patient_id: u64, patient_name: &str) -> bool {
        let Some(_running) = self.deleting.try_start() else {
            return false;
        };

        match self.core.patients().delete(patient_id).await {
            Ok(()) => {
                self.core.notify(Toast::success(
                    "Patient supprimé",
                    format!("Le patient {patient_name} a été supprimé avec succès"),
                ));
                true
            }
            Err(e) => {
                self.core.notify(Toast::error(
                    ERROR_TITLE,
                    e.detail_or(crate::resources::patients::DELETE_ERROR),
                ));
                false
            }
        }
    }
}
