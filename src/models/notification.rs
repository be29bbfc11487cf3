use serde::{Deserialize, Serialize};

use super::enums::NotificationKind;
use crate::store::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Display string, `dd/MM/yyyy HH:mm`.
    pub date: String,
    pub read: bool,
}

impl Record for Notification {
    fn record_id(&self) -> u64 {
        self.id
    }
}

/// The notifications page has no backend endpoint yet; it starts from this list.
pub fn sample_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: 1,
            kind: NotificationKind::Urgent,
            title: "Résultats Critiques".into(),
            message: "Résultats d'analyse critiques pour le patient Dubois Marie".into(),
            date: "15/01/2024 14:30".into(),
            read: false,
        },
        Notification {
            id: 2,
            kind: NotificationKind::Reminder,
            title: "Rappel de Rendez-vous".into(),
            message: "Rendez-vous de suivi avec M. Martin Jean demain à 10h00".into(),
            date: "15/01/2024 09:15".into(),
            read: true,
        },
        Notification {
            id: 3,
            kind: NotificationKind::Info,
            title: "Mise à Jour Dossier".into(),
            message: "Nouveaux documents ajoutés au dossier de Mme Bernard Sophie".into(),
            date: "14/01/2024 16:45".into(),
            read: false,
        },
    ]
}
