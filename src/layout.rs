//! Shell around every signed-in screen: navigation, device class, preloader.

use crate::auth::SessionState;
use crate::models::User;

/// Viewports narrower than this get the mobile chrome (tablets included).
pub const MOBILE_BREAKPOINT_PX: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Desktop,
}

impl DeviceType {
    pub fn from_width(width_px: u32) -> Self {
        if width_px < MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub admin_only: bool,
}

const fn item(href: &'static str, label: &'static str) -> NavItem {
    NavItem {
        href,
        label,
        admin_only: false,
    }
}

/// Sidebar entries, in display order.
pub const SIDEBAR: &[NavItem] = &[
    item("/dashboard", "Tableau de Bord"),
    item("/patients", "Patients"),
    item("/dossiers", "Dossiers Médicaux"),
    item("/workflows", "Workflows"),
    item("/notifications", "Notifications"),
    item("/parametres", "Paramètres"),
    NavItem {
        href: "/admin",
        label: "Administration",
        admin_only: true,
    },
];

/// Bottom tab bar on mobile.
pub const MOBILE_NAV: &[NavItem] = &[
    item("/dashboard", "Accueil"),
    item("/patients", "Patients"),
    item("/dossiers", "Dossiers"),
    item("/notifications", "Alertes"),
    item("/parametres", "Réglages"),
];

impl NavItem {
    /// Highlighted on its own page and on any page below it.
    pub fn is_active(&self, path: &str) -> bool {
        path == self.href
            || path
                .strip_prefix(self.href)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Sidebar entries visible to `user`.
pub fn sidebar_for(user: &User) -> Vec<NavItem> {
    SIDEBAR
        .iter()
        .filter(|item| !item.admin_only || user.is_admin())
        .copied()
        .collect()
}

/// What the signed-in layout renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Shell {
    Preloader,
    Ready {
        device: DeviceType,
        nav: Vec<NavItem>,
    },
}

/// The preloader stays until the session has a user.
pub fn shell(state: &SessionState, width_px: u32) -> Shell {
    match state.user() {
        None => Shell::Preloader,
        Some(user) => {
            let device = DeviceType::from_width(width_px);
            let nav = match device {
                DeviceType::Mobile => MOBILE_NAV.to_vec(),
                DeviceType::Desktop => sidebar_for(user),
            };
            Shell::Ready { device, nav }
        }
    }
}
