//! Administration screen: doctor accounts.
//!
//! Reached only through `AdminRouteGuard`. Toasts for backend outcomes come
//! from `AdminResource`; this controller adds the client-side checks and
//! owns the three dialogs (add, edit, password) plus the delete confirmation.

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::busy::ActionFlag;
use crate::core_state::CoreState;
use crate::models::{Doctor, DoctorInput, SPECIALITES};
use crate::toast::Toast;

pub const ALL_FIELDS_REQUIRED: &str = "Veuillez remplir tous les champs";
pub const REQUIRED_FIELDS: &str = "Veuillez remplir tous les champs obligatoires";
pub const PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas";

pub struct AdminPage {
    core: Arc<CoreState>,
    pub search: String,

    pub add_dialog_open: bool,
    pub form: DoctorInput,

    /// Doctor shown in the edit dialog.
    editing: Option<u64>,
    pub edit_form: DoctorInput,

    /// Doctor whose password is being reset.
    password_target: Option<u64>,
    pub password: String,
    pub password_confirmation: String,

    /// Doctor awaiting delete confirmation.
    delete_target: Option<u64>,

    saving: ActionFlag,
    deleting: ActionFlag,
}

impl AdminPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            search: String::new(),
            add_dialog_open: false,
            form: DoctorInput::default(),
            editing: None,
            edit_form: DoctorInput::default(),
            password_target: None,
            password: String::new(),
            password_confirmation: String::new(),
            delete_target: None,
            saving: ActionFlag::new(),
            deleting: ActionFlag::new(),
        }
    }

    pub async fn load(&self) {
        self.core.admin().fetch().await;
    }

    pub fn visible(&self) -> Vec<Doctor> {
        self.core.admin().search(&self.search)
    }

    pub fn specialites() -> &'static [&'static str] {
        SPECIALITES
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_running()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_running()
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn password_target(&self) -> Option<u64> {
        self.password_target
    }

    pub fn delete_target(&self) -> Option<u64> {
        self.delete_target
    }

    // ── Add ─────────────────────────────────────────────────

    pub fn open_add(&mut self) {
        self.form = DoctorInput::default();
        self.add_dialog_open = true;
    }

    pub async fn submit_add(&mut self) -> bool {
        let f = &self.form;
        let filled = [&f.nom, &f.prenom, &f.email, &f.specialite, &f.password]
            .iter()
            .all(|v| !v.trim().is_empty());
        if !filled {
            self.core
                .notify(Toast::error(ERROR_TITLE, ALL_FIELDS_REQUIRED));
            return false;
        }

        let result = {
            let Some(_running) = self.saving.try_start() else {
                return false;
            };
            self.core.admin().add(&self.form).await
        };
        if result.is_err() {
            return false;
        }
        self.form = DoctorInput::default();
        self.add_dialog_open = false;
        true
    }

    // ── Edit ────────────────────────────────────────────────

    pub fn open_edit(&mut self, id: u64) -> bool {
        let Some(doctor) = self.core.admin().store().get(id) else {
            return false;
        };
        self.edit_form = DoctorInput::from_doctor(&doctor);
        self.editing = Some(id);
        true
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
        self.edit_form = DoctorInput::default();
    }

    pub async fn submit_edit(&mut self) -> bool {
        let Some(id) = self.editing else {
            return false;
        };
        let f = &self.edit_form;
        let filled = [&f.nom, &f.prenom, &f.email, &f.specialite]
            .iter()
            .all(|v| !v.trim().is_empty());
        if !filled {
            self.core.notify(Toast::error(ERROR_TITLE, REQUIRED_FIELDS));
            return false;
        }

        let result = {
            let Some(_running) = self.saving.try_start() else {
                return false;
            };
            self.core.admin().update(id, &self.edit_form).await
        };
        if result.is_err() {
            return false;
        }
        self.close_edit();
        true
    }

    // ── Password ────────────────────────────────────────────

    pub fn open_password(&mut self, id: u64) {
        self.password_target = Some(id);
        self.password.clear();
        self.password_confirmation.clear();
    }

    pub fn close_password(&mut self) {
        self.password_target = None;
        self.password.clear();
        self.password_confirmation.clear();
    }

    /// Both fields filled and equal, otherwise nothing is sent and the dialog stays open.
    pub async fn submit_password(&mut self) -> bool {
        let Some(id) = self.password_target else {
            return false;
        };
        if self.password.is_empty() || self.password_confirmation.is_empty() {
            self.core
                .notify(Toast::error(ERROR_TITLE, ALL_FIELDS_REQUIRED));
            return false;
        }
        if self.password != self.password_confirmation {
            self.core.notify(Toast::error(ERROR_TITLE, PASSWORD_MISMATCH));
            return false;
        }

        let result = {
            let Some(_running) = self.saving.try_start() else {
                return false;
            };
            self.core
                .admin()
                .update_password(id, &self.password, &self.password_confirmation)
                .await
        };
        if result.is_err() {
            return false;
        }
        self.close_password();
        true
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete(&mut self, id: u64) {
        self.delete_target = Some(id);
    }

    pub fn dismiss_delete(&mut self) {
        self.delete_target = None;
    }

    /// The confirmation closes whatever the outcome.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.delete_target.take() else {
            return false;
        };
        let Some(_running) = self.deleting.try_start() else {
            return false;
        };
        self.core.admin().delete(id).await.is_ok()
    }
}
