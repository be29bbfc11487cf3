//! Home screen: counters, per-stage evolution and today's lists.

use std::sync::Arc;

use serde::Serialize;

use super::capitalize;
use crate::core_state::CoreState;
use crate::models::{format_date_fr, Appointment, DashboardAlert, DashboardData};

pub const EVOLUTION_TITLE: &str = "Évolution des Patients par Stade";
pub const TODAY_TITLE: &str = "Rendez-vous du jour";
pub const ALERTS_TITLE: &str = "Alertes";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u64,
    /// Where a click on the card leads, if anywhere.
    pub link: Option<&'static str>,
}

/// One line of the evolution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSeries {
    pub name: String,
    /// (month, count) in server order.
    pub points: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentRow {
    pub heure: String,
    pub patient: String,
    pub numero_dossier: String,
    pub motif: String,
    pub status: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub date: String,
    pub patient: String,
    pub numero_dossier: String,
    pub motif: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub evolution: Vec<StageSeries>,
    pub today_appointments: Vec<AppointmentRow>,
    pub alerts: Vec<AlertRow>,
}

impl DashboardView {
    pub fn from_data(data: &DashboardData) -> Self {
        let cards = vec![
            StatCard {
                title: "Patients Suivis",
                value: data.patients.total,
                link: Some("/patients"),
            },
            StatCard {
                title: "Alertes Urgentes",
                value: data.alerts.total,
                link: Some("/notifications"),
            },
            StatCard {
                title: "RDV du Jour",
                value: data.appointments.today,
                link: None,
            },
        ];

        let evolution = (1..=5u8)
            .map(|stade| StageSeries {
                name: format!("Stade {stade}"),
                points: data
                    .evolution
                    .iter()
                    .map(|p| (p.month.clone(), p.stages.get(stade).unwrap_or(0)))
                    .collect(),
            })
            .collect();

        Self {
            cards,
            evolution,
            today_appointments: data.appointments.today_items.iter().map(appointment_row).collect(),
            alerts: data.alerts.items.iter().map(alert_row).collect(),
        }
    }

    /// Titles of the sections to render, in order. The two lists are left
    /// out entirely when empty.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections = vec![EVOLUTION_TITLE];
        if !self.today_appointments.is_empty() {
            sections.push(TODAY_TITLE);
        }
        if !self.alerts.is_empty() {
            sections.push(ALERTS_TITLE);
        }
        sections
    }
}

fn patient_link(patient_id: Option<u64>) -> Option<String> {
    patient_id.map(|id| format!("/dossiers/{id}"))
}

fn appointment_row(appointment: &Appointment) -> AppointmentRow {
    AppointmentRow {
        heure: appointment.heure.clone(),
        patient: appointment.patient_nom.clone(),
        numero_dossier: appointment.numero_dossier.clone(),
        motif: appointment.motif.clone(),
        status: capitalize(&appointment.status),
        link: patient_link(appointment.patient_id),
    }
}

fn alert_row(alert: &DashboardAlert) -> AlertRow {
    AlertRow {
        date: format_date_fr(&alert.date),
        patient: alert.patient_nom.clone(),
        numero_dossier: alert.numero_dossier.clone(),
        motif: alert.motif.clone(),
        link: patient_link(alert.patient_id),
    }
}

pub struct DashboardPage {
    core: Arc<CoreState>,
}

impl DashboardPage {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Failures are toasted by the resource; the last data stays shown.
    pub async fn load(&self) {
        let _ = self.core.dashboard().fetch().await;
    }

    pub fn is_loading(&self) -> bool {
        self.core.dashboard().is_loading()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_data(&self.core.dashboard().data())
    }
}
