use serde::{Deserialize, Serialize};

use super::lenient;
use crate::store::{contains_ci, Record, Searchable};

/// Recurring exam: `frequence` is free text ("3 mois").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularExam {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub frequence: String,
}

impl RegularExam {
    pub fn new(kind: &str, frequence: &str) -> Option<Self> {
        let (kind, frequence) = (kind.trim(), frequence.trim());
        if kind.is_empty() || frequence.is_empty() {
            return None;
        }
        Some(Self {
            kind: kind.to_string(),
            frequence: frequence.to_string(),
        })
    }

    /// "Créatinine - Tous les 3 mois".
    pub fn summary(&self) -> String {
        format!("{} - Tous les {}", self.kind, self.frequence)
    }
}

/// Threshold alert. `condition` is stored and displayed, never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(default, deserialize_with = "lenient::string")]
    pub indicateur: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub condition: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
}

impl AlertRule {
    pub fn new(indicateur: &str, condition: &str, message: &str) -> Option<Self> {
        let fields = [indicateur.trim(), condition.trim(), message.trim()];
        if fields.iter().any(|f| f.is_empty()) {
            return None;
        }
        let [indicateur, condition, message] = fields;
        Some(Self {
            indicateur: indicateur.to_string(),
            condition: condition.to_string(),
            message: message.to_string(),
        })
    }

    /// "DFG < 30 : Orienter vers dialyse".
    pub fn summary(&self) -> String {
        format!("{} {} : {}", self.indicateur, self.condition, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_u8")]
    pub stade: Option<u8>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub examens_reguliers: Vec<RegularExam>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub alertes: Vec<AlertRule>,
}

impl Record for Workflow {
    fn record_id(&self) -> u64 {
        self.id
    }
}

impl Searchable for Workflow {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.nom, needle) || contains_ci(&self.description, needle)
    }
}

/// Body of workflow create / update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowInput {
    pub nom: String,
    pub description: String,
    pub stade: Option<u8>,
    pub examens_reguliers: Vec<RegularExam>,
    pub alertes: Vec<AlertRule>,
}

impl WorkflowInput {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        Self {
            nom: workflow.nom.clone(),
            description: workflow.description.clone(),
            stade: workflow.stade,
            examens_reguliers: workflow.examens_reguliers.clone(),
            alertes: workflow.alertes.clone(),
        }
    }
}
