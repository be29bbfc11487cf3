//! Patient file screen (`/dossiers/:id`, keyed by patient id).
//!
//! Six tabs over the `PatientFile` loaded by `PatientResource`: visit
//! history, patient information, antecedents and treatments, aggregated
//! exams, aggregated prescriptions, and the generated report. On mobile the
//! tabs are swiped; swiping past either end stays put.
//!
//! The visit dialog serves both create and edit. Every successful write
//! reloads the whole file.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Timelike};

use super::report::{generate_medical_report, MedicalReport};
use super::ERROR_TITLE;
use crate::busy::ActionFlag;
use crate::core_state::CoreState;
use crate::models::{PatientInput, Prescription, ResultLine, VisiteInput};
use crate::resources::patient::CANCELLED_VISIT;
use crate::resources::PatientFile;
use crate::toast::Toast;

pub const LOAD_ERROR: &str = "Impossible de charger les données du patient";
pub const PRESCRIPTION_INCOMPLETE: &str =
    "Le médicament et la posologie sont obligatoires pour ajouter une prescription";
pub const CREATE_VISIT_ERROR: &str = "Erreur lors de l'enregistrement de la visite";
pub const UPDATE_VISIT_ERROR: &str = "Erreur lors de la mise à jour de la visite";
pub const CANCEL_VISIT_ERROR: &str = "Erreur lors de l'annulation de la visite";
pub const UPDATE_PATIENT_ERROR: &str = "Erreur lors de la mise à jour du patient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Visites,
    Informations,
    Antecedents,
    Examens,
    Prescriptions,
    Rapport,
}

impl Tab {
    /// Display order, which is also the swipe order.
    pub const ALL: &'static [Tab] = &[
        Tab::Visites,
        Tab::Informations,
        Tab::Antecedents,
        Tab::Examens,
        Tab::Prescriptions,
        Tab::Rapport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Visites => "visites",
            Tab::Informations => "informations",
            Tab::Antecedents => "antecedents",
            Tab::Examens => "examens",
            Tab::Prescriptions => "prescriptions",
            Tab::Rapport => "rapport",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Visites => "Visites",
            Tab::Informations => "Informations",
            Tab::Antecedents => "Antécédents",
            Tab::Examens => "Examens",
            Tab::Prescriptions => "Prescriptions",
            Tab::Rapport => "Rapport",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Tab to the right; the last one stays put.
    pub fn next(self) -> Tab {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(self)
    }

    /// Tab to the left; the first one stays put.
    pub fn previous(self) -> Tab {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(self)
    }
}

/// Examen or biologie line being typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDraft {
    pub kind: String,
    pub resultat: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrescriptionDraft {
    pub medicament: String,
    pub posologie: String,
}

pub struct DossierDetailPage {
    core: Arc<CoreState>,
    patient_id: u64,
    pub tab: Tab,

    // ── Visit dialog ──
    pub visit_dialog_open: bool,
    pub visit: VisiteInput,
    /// `Some(id)` while the dialog edits an existing visit.
    editing_visit: Option<u64>,
    pub examen: LineDraft,
    pub biologie: LineDraft,
    pub prescription: PrescriptionDraft,

    // ── Informations tab ──
    pub patient_form: PatientInput,
    pub editing_patient: bool,

    saving_visit: ActionFlag,
    cancelling_visit: ActionFlag,
    saving_patient: ActionFlag,
}

impl DossierDetailPage {
    pub fn new(core: Arc<CoreState>, patient_id: u64) -> Self {
        Self {
            core,
            patient_id,
            tab: Tab::Visites,
            visit_dialog_open: false,
            visit: blank_visit(patient_id),
            editing_visit: None,
            examen: LineDraft::default(),
            biologie: LineDraft::default(),
            prescription: PrescriptionDraft::default(),
            patient_form: PatientInput::default(),
            editing_patient: false,
            saving_visit: ActionFlag::new(),
            cancelling_visit: ActionFlag::new(),
            saving_patient: ActionFlag::new(),
        }
    }

    pub fn patient_id(&self) -> u64 {
        self.patient_id
    }

    /// Fetch the file and pre-fill the information form from it.
    pub async fn load(&mut self) -> bool {
        match self.core.patient().load(self.patient_id).await {
            Ok(file) => {
                if !self.editing_patient {
                    self.patient_form = PatientInput::from_patient(&file.patient);
                }
                true
            }
            Err(e) => {
                tracing::warn!(patient_id = self.patient_id, error = %e, "Patient file load failed");
                self.core.notify(Toast::error(ERROR_TITLE, LOAD_ERROR));
                false
            }
        }
    }

    /// The loaded file, when it belongs to this page's patient.
    pub fn file(&self) -> Option<PatientFile> {
        self.core
            .patient()
            .file()
            .filter(|f| f.patient.id == self.patient_id)
    }

    pub fn is_loading(&self) -> bool {
        self.core.patient().is_loading()
    }

    pub fn editing_visit(&self) -> Option<u64> {
        self.editing_visit
    }

    pub fn is_saving_visit(&self) -> bool {
        self.saving_visit.is_running()
    }

    pub fn is_saving_patient(&self) -> bool {
        self.saving_patient.is_running()
    }

    pub fn report(&self, today: NaiveDate) -> Option<MedicalReport> {
        self.file().map(|f| generate_medical_report(&f, today))
    }

    // ── Tabs ────────────────────────────────────────────────

    pub fn swipe_left(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn swipe_right(&mut self) {
        self.tab = self.tab.previous();
    }

    // ── Visit dialog ────────────────────────────────────────

    /// Open the dialog on a fresh draft dated now.
    pub fn open_new_visit(&mut self) {
        self.reset_visit();
        self.visit_dialog_open = true;
    }

    /// Open the dialog on an existing visit. Cancelled visits are read-only.
    pub fn edit_visit(&mut self, visit_id: u64) -> bool {
        let Some(file) = self.file() else {
            return false;
        };
        let Some(visite) = file.visite(visit_id) else {
            return false;
        };
        if !visite.is_active() {
            self.core.notify(Toast::error(ERROR_TITLE, CANCELLED_VISIT));
            return false;
        }

        self.visit = VisiteInput::from_visite(self.patient_id, visite);
        self.editing_visit = Some(visit_id);
        self.examen = LineDraft::default();
        self.biologie = LineDraft::default();
        self.prescription = PrescriptionDraft::default();
        self.visit_dialog_open = true;
        true
    }

    pub fn close_visit_dialog(&mut self) {
        self.reset_visit();
    }

    /// A blank type is ignored; a blank result is stored as pending.
    pub fn add_examen(&mut self) -> bool {
        match ResultLine::new(&self.examen.kind, &self.examen.resultat) {
            Some(line) => {
                self.visit.examens.push(line);
                self.examen = LineDraft::default();
                true
            }
            None => false,
        }
    }

    pub fn remove_examen(&mut self, index: usize) {
        if index < self.visit.examens.len() {
            self.visit.examens.remove(index);
        }
    }

    pub fn add_biologie(&mut self) -> bool {
        match ResultLine::new(&self.biologie.kind, &self.biologie.resultat) {
            Some(line) => {
                self.visit.biologie.push(line);
                self.biologie = LineDraft::default();
                true
            }
            None => false,
        }
    }

    pub fn remove_biologie(&mut self, index: usize) {
        if index < self.visit.biologie.len() {
            self.visit.biologie.remove(index);
        }
    }

    pub fn add_prescription(&mut self) -> bool {
        match Prescription::new(&self.prescription.medicament, &self.prescription.posologie) {
            Some(line) => {
                self.visit.prescriptions.push(line);
                self.prescription = PrescriptionDraft::default();
                true
            }
            None => {
                self.core
                    .notify(Toast::error(ERROR_TITLE, PRESCRIPTION_INCOMPLETE));
                false
            }
        }
    }

    pub fn remove_prescription(&mut self, index: usize) {
        if index < self.visit.prescriptions.len() {
            self.visit.prescriptions.remove(index);
        }
    }

    /// Create or update, depending on how the dialog was opened.
    pub async fn submit_visit(&mut self) -> bool {
        let result = {
            let Some(_running) = self.saving_visit.try_start() else {
                return false;
            };
            match self.editing_visit {
                None => self
                    .core
                    .patient()
                    .create_visite(&self.visit)
                    .await
                    .map(|()| {
                        Toast::success(
                            "Visite enregistrée",
                            "La nouvelle visite a été ajoutée au dossier",
                        )
                    })
                    .map_err(|e| e.detail_or(CREATE_VISIT_ERROR)),
                Some(id) => self
                    .core
                    .patient()
                    .update_visite(id, &self.visit)
                    .await
                    .map(|()| {
                        Toast::success("Visite mise à jour", "Les modifications ont été enregistrées")
                    })
                    .map_err(|e| e.detail_or(UPDATE_VISIT_ERROR)),
            }
        };

        match result {
            Ok(toast) => {
                self.core.notify(toast);
                self.reset_visit();
                self.load().await;
                true
            }
            Err(message) => {
                self.core.notify(Toast::error(ERROR_TITLE, message));
                false
            }
        }
    }

    pub async fn cancel_visit(&mut self, visit_id: u64) -> bool {
        let result = {
            let Some(_running) = self.cancelling_visit.try_start() else {
                return false;
            };
            self.core.patient().cancel_visite(visit_id).await
        };

        match result {
            Ok(()) => {
                self.core.notify(Toast::success(
                    "Visite annulée",
                    "La visite a été marquée comme annulée",
                ));
                self.load().await;
                true
            }
            Err(e) => {
                self.core
                    .notify(Toast::error(ERROR_TITLE, e.detail_or(CANCEL_VISIT_ERROR)));
                false
            }
        }
    }

    fn reset_visit(&mut self) {
        self.visit = blank_visit(self.patient_id);
        self.editing_visit = None;
        self.examen = LineDraft::default();
        self.biologie = LineDraft::default();
        self.prescription = PrescriptionDraft::default();
        self.visit_dialog_open = false;
    }

    // ── Informations tab ────────────────────────────────────

    pub fn start_editing_patient(&mut self) {
        if let Some(file) = self.file() {
            self.patient_form = PatientInput::from_patient(&file.patient);
        }
        self.editing_patient = true;
    }

    pub fn cancel_editing_patient(&mut self) {
        self.editing_patient = false;
        if let Some(file) = self.file() {
            self.patient_form = PatientInput::from_patient(&file.patient);
        }
    }

    pub async fn update_patient(&mut self) -> bool {
        let result = {
            let Some(_running) = self.saving_patient.try_start() else {
                return false;
            };
            self.core
                .patient()
                .update_patient(self.patient_id, &self.patient_form)
                .await
        };

        match result {
            Ok(()) => {
                self.core.notify(Toast::success(
                    "Patient mis à jour",
                    "Les informations du patient ont été mises à jour avec succès",
                ));
                self.editing_patient = false;
                self.load().await;
                true
            }
            Err(e) => {
                self.core
                    .notify(Toast::error(ERROR_TITLE, e.detail_or(UPDATE_PATIENT_ERROR)));
                false
            }
        }
    }
}

fn blank_visit(patient_id: u64) -> VisiteInput {
    let now = Local::now();
    let time = now.time().with_second(0).unwrap_or(now.time());
    VisiteInput::new(patient_id, now.date_naive(), time)
}
