//! Paramètres: account, notification preferences, password and theme.

use std::sync::Arc;

use super::ERROR_TITLE;
use crate::busy::ActionFlag;
use crate::core_state::CoreState;
use crate::models::{NotificationPreferences, PasswordChange, ProfileUpdate, Theme};
use crate::toast::Toast;

pub const PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas";
pub const PASSWORD_TOO_SHORT: &str = "Le mot de passe doit contenir au moins 8 caractères";
pub const MIN_PASSWORD_LEN: usize = 8;

pub struct SettingsPage {
    core: Arc<CoreState>,
    pub profile: ProfileUpdate,
    pub password: PasswordChange,
    updating_profile: ActionFlag,
    changing_password: ActionFlag,
}

impl SettingsPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        let mut page = Self {
            core,
            profile: ProfileUpdate::default(),
            password: PasswordChange::default(),
            updating_profile: ActionFlag::new(),
            changing_password: ActionFlag::new(),
        };
        page.prefill();
        page
    }

    /// Fetch the doctor profile, then refresh the form from it.
    pub async fn load(&mut self) {
        if self.core.medecin().fetch_profile().await.is_ok() {
            self.prefill();
        }
    }

    /// Name and email come from the session user, specialite and
    /// preferences from the doctor profile.
    fn prefill(&mut self) {
        if let Some(user) = self.core.auth().user() {
            self.profile.name = user.name;
            self.profile.email = user.email;
        }
        if let Some(profile) = self.core.medecin().profile() {
            self.profile.specialite = profile.specialite;
            self.profile.preferences_notifications = profile.preferences_notifications;
        }
    }

    pub fn is_updating_profile(&self) -> bool {
        self.updating_profile.is_running()
    }

    pub fn is_changing_password(&self) -> bool {
        self.changing_password.is_running()
    }

    pub fn preferences(&self) -> NotificationPreferences {
        self.profile.preferences_notifications
    }

    pub fn set_email_notifications(&mut self, on: bool) {
        self.profile.preferences_notifications.email = on;
    }

    pub fn set_desktop_notifications(&mut self, on: bool) {
        self.profile.preferences_notifications.desktop = on;
    }

    pub fn set_urgent_notifications(&mut self, on: bool) {
        self.profile.preferences_notifications.urgent = on;
    }

    pub async fn save_profile(&self) -> bool {
        let Some(_running) = self.updating_profile.try_start() else {
            return false;
        };
        self.core.medecin().update_profile(&self.profile).await.is_ok()
    }

    /// Checked locally (match, then length) before anything is sent.
    /// Fields are cleared on success.
    pub async fn change_password(&mut self) -> bool {
        if self.password.password != self.password.password_confirmation {
            self.core.notify(Toast::error(ERROR_TITLE, PASSWORD_MISMATCH));
            return false;
        }
        if self.password.password.chars().count() < MIN_PASSWORD_LEN {
            self.core.notify(Toast::error(ERROR_TITLE, PASSWORD_TOO_SHORT));
            return false;
        }

        let result = {
            let Some(_running) = self.changing_password.try_start() else {
                return false;
            };
            self.core.medecin().update_password(&self.password).await
        };
        if result.is_err() {
            return false;
        }
        self.password = PasswordChange::default();
        true
    }

    pub fn theme(&self) -> Theme {
        self.core.theme()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.core.set_theme(theme);
        self.core.notify(Toast::success(
            "Thème modifié",
            format!("Le thème {theme} a été appliqué"),
        ));
    }
}
