//! Screen controllers.
//!
//! One struct per screen, holding its drafts, dialog flags and submit flags
//! over the shared `CoreState`. Rendering is left to the embedding UI; a
//! controller only decides what to send, what to show and which toast to
//! raise. Methods that submit return whether the action succeeded.

pub mod admin;
pub mod dashboard;
pub mod dossier_detail;
pub mod dossiers;
pub mod notifications;
pub mod patients;
pub mod report;
pub mod settings;
pub mod workflows;

pub use admin::AdminPage;
pub use dashboard::DashboardPage;
pub use dossier_detail::{DossierDetailPage, Tab};
pub use dossiers::DossiersPage;
pub use notifications::NotificationsPage;
pub use patients::PatientsPage;
pub use report::{generate_medical_report, MedicalReport};
pub use settings::SettingsPage;
pub use workflows::WorkflowsPage;

pub(crate) use crate::resources::ERROR_TITLE;

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
