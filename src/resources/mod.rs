//! One module per REST resource.
//!
//! Each resource wraps the CRUD calls for its endpoints and keeps the
//! result in a shared store (see `CoreState`). Fetches toggle the store's
//! loading flag and, on failure, record an error while keeping the
//! previous data. Mutators call the backend first and patch the store only
//! on success. Where the corresponding screen expects it, the resource also
//! pushes the user-facing toast itself.

pub mod admin;
pub mod dashboard;
pub mod dossiers;
pub mod medecin;
pub mod patient;
pub mod patients;
pub mod workflows;

pub use admin::AdminResource;
pub use dashboard::DashboardResource;
pub use dossiers::DossiersResource;
pub use medecin::MedecinResource;
pub use patient::{PatientFile, PatientResource};
pub use patients::PatientsResource;
pub use workflows::WorkflowsResource;

/// Generic fallback when the backend gives no usable message.
pub const GENERIC_ERROR: &str = "Une erreur est survenue";

/// Toast title used for every failure.
pub(crate) const ERROR_TITLE: &str = "Erreur";
