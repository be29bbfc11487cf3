//! Notification centre.
//!
//! The backend has no notification endpoint; the list starts from
//! `sample_notifications()` and read flags live only in this page.

use std::sync::Arc;

use crate::config::HOME_ROUTE;
use crate::core_state::CoreState;
use crate::models::{sample_notifications, Notification, NotificationKind};
use crate::toast::Toast;

pub struct NotificationsPage {
    core: Arc<CoreState>,
    items: Vec<Notification>,
}

impl NotificationsPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self::with_items(core, sample_notifications())
    }

    pub fn with_items(core: Arc<CoreState>, items: Vec<Notification>) -> Self {
        Self { core, items }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Returns false for an unknown id.
    pub fn mark_read(&mut self, id: u64) -> bool {
        let Some(item) = self.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        item.read = true;
        self.core.notify(Toast::success(
            "Notification marquée comme lue",
            "La notification a été mise à jour",
        ));
        true
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
        self.core.notify(Toast::success(
            "Toutes les notifications ont été marquées comme lues",
            "Votre liste de notifications a été mise à jour",
        ));
    }

    /// Route opened by a click. Reminders lead to the appointment list on
    /// the home screen, everything else to the dossiers.
    pub fn target(notification: &Notification) -> &'static str {
        match notification.kind {
            NotificationKind::Urgent | NotificationKind::Info => "/dossiers",
            NotificationKind::Reminder => HOME_ROUTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[tokio::test]
    async fn mark_one_then_all() {
        let backend = MockBackend::start().await;
        let (core, toasts) = backend.core();
        let mut page = NotificationsPage::new(core);
        assert_eq!(page.unread_count(), 2);

        assert!(page.mark_read(1));
        assert_eq!(page.unread_count(), 1);
        assert_eq!(toasts.last().unwrap().title, "Notification marquée comme lue");

        assert!(!page.mark_read(99));
        assert_eq!(toasts.len(), 1);

        page.mark_all_read();
        assert_eq!(page.unread_count(), 0);
        assert_eq!(
            toasts.last().unwrap().description,
            "Votre liste de notifications a été mise à jour"
        );
        assert_eq!(backend.total_hits(), 0);
    }

    #[tokio::test]
    async fn click_targets_by_kind() {
        let backend = MockBackend::start().await;
        let (core, _) = backend.core();
        let page = NotificationsPage::new(core);

        let targets: Vec<&str> = page.items().iter().map(NotificationsPage::target).collect();
        assert_eq!(targets, vec!["/dossiers", HOME_ROUTE, "/dossiers"]);
    }
}
