use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + label + std::str::FromStr pattern.
/// The wire value is the string literal, the label is the French display text.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal : $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(VisiteStatus {
    Planifie => "planifié" : "Planifié",
    Termine => "terminé" : "Terminé",
    Annule => "annulé" : "Annulé",
});

str_enum!(DossierStatus {
    Urgent => "urgent" : "Urgent",
    EnCours => "en_cours" : "En cours",
    Stable => "stable" : "Stable",
});

str_enum!(AntecedentCategory {
    MaladiesChroniques => "maladies_chroniques" : "Maladies chroniques",
    Allergies => "allergies" : "Allergies",
    Chirurgies => "chirurgies" : "Chirurgies",
    Hospitalisations => "hospitalisations" : "Hospitalisations",
    TraitementsPasses => "traitements_passes" : "Traitements passés",
    AntecedentsFamiliaux => "antecedents_familiaux" : "Antécédents familiaux",
    Vaccinations => "vaccinations" : "Vaccinations",
});

str_enum!(TreatmentCategory {
    Medicaments => "medicaments" : "Médicaments",
    Therapies => "therapies" : "Thérapies",
    DispositifsMedicaux => "dispositifs_medicaux" : "Dispositifs médicaux",
    Reeducation => "reeducation" : "Rééducation",
    Dialyse => "dialyse" : "Dialyse",
    Nutrition => "nutrition" : "Nutrition",
    Autres => "autres" : "Autres traitements",
});

str_enum!(NotificationKind {
    Urgent => "urgent" : "Urgent",
    Reminder => "reminder" : "Rappel",
    Info => "info" : "Information",
});

str_enum!(Theme {
    Light => "light" : "Clair",
    Dark => "dark" : "Sombre",
    System => "system" : "Système",
});

impl VisiteStatus {
    /// Transitions reachable through the dossier editor.
    ///
    /// `annulé` is terminal; a completed visit is never reopened.
    pub fn can_transition_to(self, next: VisiteStatus) -> bool {
        use VisiteStatus::*;
        matches!(
            (self, next),
            (Planifie, Planifie)
                | (Planifie, Termine)
                | (Planifie, Annule)
                | (Termine, Termine)
                | (Termine, Annule)
        )
    }

    pub fn is_cancelled(self) -> bool {
        self == VisiteStatus::Annule
    }
}

/// Fallback for a missing or unknown status: the visit stays active.
impl Default for VisiteStatus {
    fn default() -> Self {
        Self::Planifie
    }
}

/// Fallback for a missing or unknown status, shown with the "Stable" badge.
impl Default for DossierStatus {
    fn default() -> Self {
        Self::Stable
    }
}
