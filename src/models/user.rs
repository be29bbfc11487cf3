use serde::{Deserialize, Serialize};

use super::lenient;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEDECIN: &str = "medecin";

/// Authenticated account from `GET /api/user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    /// `admin`, `medecin`, or any other string the backend uses.
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email_verified_at: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_medecin(&self) -> bool {
        self.role == ROLE_MEDECIN
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}
