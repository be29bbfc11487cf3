use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::store::{contains_ci, Record, Searchable};

/// Specialties offered by the doctor form.
pub const SPECIALITES: &[&str] = &["Néphrologie", "Cardiologie", "Médecine Générale"];

/// Doctor as returned by `GET /api/admin/medecins`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiMedecin {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub specialite: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
}

/// Account state shown in the admin table. The backend has no such field:
/// every listed doctor is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoctorStatus {
    Actif,
}

/// Doctor as the admin page displays it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    pub id: u64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub specialite: String,
    /// `dd/MM/yyyy`.
    pub date_creation: String,
    pub status: DoctorStatus,
}

/// Split a backend `name` ("Nom Prénom…") into (nom, prenom).
/// The first word is the surname, everything after it the given names.
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((nom, prenom)) => (nom.to_string(), prenom.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

impl From<ApiMedecin> for Doctor {
    fn from(api: ApiMedecin) -> Self {
        let (nom, prenom) = split_name(&api.name);
        Self {
            id: api.id,
            nom,
            prenom,
            email: api.email,
            specialite: api.specialite,
            date_creation: super::format_date_fr(&api.created_at),
            status: DoctorStatus::Actif,
        }
    }
}

impl Doctor {
    /// Local record for a doctor the backend just created.
    pub fn from_input(id: u64, input: &DoctorInput, created: NaiveDate) -> Self {
        Self {
            id,
            nom: input.nom.trim().to_string(),
            prenom: input.prenom.trim().to_string(),
            email: input.email.trim().to_string(),
            specialite: input.specialite.clone(),
            date_creation: created.format("%d/%m/%Y").to_string(),
            status: DoctorStatus::Actif,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

impl Record for Doctor {
    fn record_id(&self) -> u64 {
        self.id
    }
}

impl Searchable for Doctor {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.nom, needle)
            || contains_ci(&self.prenom, needle)
            || contains_ci(&self.email, needle)
            || contains_ci(&self.specialite, needle)
    }
}

/// Admin doctor form. `password` is only sent on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorInput {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub specialite: String,
    pub password: String,
}

impl DoctorInput {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            nom: doctor.nom.clone(),
            prenom: doctor.prenom.clone(),
            email: doctor.email.clone(),
            specialite: doctor.specialite.clone(),
            password: String::new(),
        }
    }

    /// Backend `name`: "nom prenom".
    pub fn api_name(&self) -> String {
        format!("{} {}", self.nom.trim(), self.prenom.trim())
            .trim()
            .to_string()
    }
}

/// Body of `POST /api/admin/medecins` (with password) and `PUT` (without).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedecinPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub specialite: String,
    pub preferences_notifications: Vec<String>,
}

impl MedecinPayload {
    pub fn create(input: &DoctorInput) -> Self {
        Self {
            name: input.api_name(),
            email: input.email.trim().to_string(),
            password: Some(input.password.clone()),
            specialite: input.specialite.clone(),
            preferences_notifications: Vec::new(),
        }
    }

    pub fn update(input: &DoctorInput) -> Self {
        Self {
            password: None,
            ..Self::create(input)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub desktop: bool,
    #[serde(default)]
    pub urgent: bool,
}

/// The signed-in doctor's own profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedecinProfile {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub specialite: String,
    /// Accounts created by the admin page store `[]` here.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub preferences_notifications: NotificationPreferences,
}

/// Body of `PUT /api/medecin/profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub specialite: String,
    pub preferences_notifications: NotificationPreferences,
}

/// Body of `PUT /api/medecin/password`.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}
