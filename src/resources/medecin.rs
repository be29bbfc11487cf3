//! The signed-in doctor's own profile and password.

use std::sync::Arc;

use serde::Deserialize;

use super::ERROR_TITLE;
use crate::error::{join_field_errors, ClientError};
use crate::http::ApiClient;
use crate::models::{MedecinProfile, PasswordChange, ProfileUpdate};
use crate::store::Slot;
use crate::toast::{Notifier, Toast};

pub const FETCH_ERROR: &str = "Erreur lors de la récupération du profil médecin";
pub const PROFILE_ERROR: &str = "Erreur lors de la mise à jour du profil";
pub const PASSWORD_ERROR: &str = "Erreur lors de la mise à jour du mot de passe";

#[derive(Deserialize)]
struct ProfileBody {
    medecin: MedecinProfile,
}

#[derive(Clone)]
pub struct MedecinResource {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    profile: Arc<Slot<MedecinProfile>>,
}

impl MedecinResource {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        profile: Arc<Slot<MedecinProfile>>,
    ) -> Self {
        Self {
            api,
            notifier,
            profile,
        }
    }

    pub fn slot(&self) -> &Arc<Slot<MedecinProfile>> {
        &self.profile
    }

    pub fn profile(&self) -> Option<MedecinProfile> {
        self.profile.get()
    }

    pub fn is_loading(&self) -> bool {
        self.profile.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.profile.error()
    }

    pub async fn fetch_profile(&self) -> Result<MedecinProfile, ClientError> {
        self.profile.begin();
        match self.api.get::<ProfileBody>("/api/medecin/profile").await {
            Ok(body) => {
                self.profile.finish(Ok(Some(body.medecin.clone())));
                Ok(body.medecin)
            }
            Err(e) => {
                let message = e.message_or(FETCH_ERROR);
                self.notifier.notify(Toast::error(ERROR_TITLE, &message));
                self.profile.finish(Err(message));
                Err(e)
            }
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<MedecinProfile, ClientError> {
        let body: ProfileBody = self
            .api
            .put("/api/medecin/profile", update)
            .await
            .inspect_err(|e| {
                let message = e.message_or(PROFILE_ERROR);
                self.notifier.notify(Toast::error(ERROR_TITLE, &message));
                self.profile.set_error(Some(message));
            })?;

        tracing::info!(id = body.medecin.id, "Profile updated");
        self.profile.set(body.medecin.clone());
        self.notifier.notify(Toast::success(
            "Profil mis à jour",
            "Vos informations ont été sauvegardées avec succès",
        ));
        Ok(body.medecin)
    }

    /// `PUT /api/medecin/password`. Field errors are shown joined under
    /// "Erreur de validation".
    pub async fn update_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        let result: Result<serde_json::Value, _> =
            self.api.put("/api/medecin/password", change).await;

        if let Err(e) = result {
            let errors = e.field_errors();
            let toast = if errors.is_empty() {
                Toast::error(ERROR_TITLE, e.message_or(PASSWORD_ERROR))
            } else {
                Toast::error("Erreur de validation", join_field_errors(&errors))
            };
            tracing::warn!(status = ?e.status(), "Password change rejected");
            self.notifier.notify(toast);
            return Err(e);
        }

        tracing::info!("Password changed");
        self.notifier.notify(Toast::success(
            "Mot de passe modifié",
            "Votre mot de passe a été mis à jour avec succès",
        ));
        Ok(())
    }
}
