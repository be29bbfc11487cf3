use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    #[serde(default)]
    pub stade1: u64,
    #[serde(default)]
    pub stade2: u64,
    #[serde(default)]
    pub stade3: u64,
    #[serde(default)]
    pub stade4: u64,
    #[serde(default)]
    pub stade5: u64,
}

impl StageCounts {
    /// Count for stage 1–5; `None` outside that range.
    pub fn get(&self, stade: u8) -> Option<u64> {
        match stade {
            1 => Some(self.stade1),
            2 => Some(self.stade2),
            3 => Some(self.stade3),
            4 => Some(self.stade4),
            5 => Some(self.stade5),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "byStage")]
    pub by_stage: StageCounts,
}

/// Row of the "Alertes" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAlert {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub patient_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_nom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub numero_dossier: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub motif: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub items: Vec<DashboardAlert>,
}

/// Row of the "Rendez-vous du jour" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub patient_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_nom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub numero_dossier: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub heure: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub motif: String,
    /// Visit status as sent by the backend; may be outside `VisiteStatus`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStats {
    #[serde(default)]
    pub today: u64,
    #[serde(default)]
    pub upcoming: u64,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub items: Vec<Appointment>,
    #[serde(default, rename = "todayItems", deserialize_with = "lenient::vec")]
    pub today_items: Vec<Appointment>,
}

/// One point of the stage evolution chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    #[serde(default, deserialize_with = "lenient::string")]
    pub month: String,
    #[serde(flatten)]
    pub stages: StageCounts,
}

/// Aggregates behind the dashboard. `Default` is the empty state shown
/// before the first response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub patients: PatientStats,
    #[serde(default)]
    pub alerts: AlertStats,
    #[serde(default)]
    pub appointments: AppointmentStats,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub evolution: Vec<EvolutionPoint>,
}
