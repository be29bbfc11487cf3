//! In-process stand-in for the REST backend, used by the test suites.
//!
//! An axum app bound to `127.0.0.1:0` keeps every collection as JSON in
//! memory, answers with the same envelopes as the real backend and counts
//! hits per `"METHOD /path"` so tests can assert that no request was sent.
//! Routes can be forced to fail (`fail`) or slowed down (`delay`).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::core_state::CoreState;
use crate::http::ApiClient;
use crate::toast::ToastLog;

/// Password of every seeded account.
pub(crate) const PASSWORD: &str = "secret123";
pub(crate) const ADMIN_EMAIL: &str = "admin@mrc.fr";
pub(crate) const DOCTOR_EMAIL: &str = "dr@mrc.fr";
pub(crate) const UNVERIFIED_EMAIL: &str = "nouveau@mrc.fr";

const XSRF_VALUE: &str = "jeton-xsrf==";
const XSRF_COOKIE: &str = "XSRF-TOKEN=jeton-xsrf%3D%3D; Path=/";

pub(crate) struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::seeded());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&format!("http://{}", self.addr)).with_timeout(5)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).unwrap()
    }

    /// Application state wired to this backend, with toasts captured in memory.
    pub fn core(&self) -> (Arc<CoreState>, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        let core = CoreState::new(&self.config(), toasts.clone()).unwrap();
        (Arc::new(core), toasts)
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.data().hits.get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.data().hits.values().sum()
    }

    pub fn last_body(&self, route: &str) -> Option<Value> {
        self.state.data().bodies.get(route).cloned()
    }

    pub fn last_query(&self, route: &str) -> Option<String> {
        self.state.data().queries.get(route).cloned()
    }

    pub fn last_xsrf_header(&self) -> Option<String> {
        self.state.data().last_xsrf.clone()
    }

    /// Answer every later call to `route` with `status` and `body`.
    pub fn fail(&self, route: &str, status: u16, body: Value) {
        self.state
            .data()
            .failures
            .insert(route.to_string(), (status, body));
    }

    pub fn clear_failure(&self, route: &str) {
        self.state.data().failures.remove(route);
    }

    /// Hold responses to `route` for `delay` after computing them.
    pub fn delay(&self, route: &str, delay: Duration) {
        self.state.data().delays.insert(route.to_string(), delay);
    }

    pub fn patients(&self) -> Vec<Value> {
        self.state.data().patients.clone()
    }

    pub fn visites(&self) -> Vec<Value> {
        self.state.data().visites.clone()
    }

    /// Open a session directly, as if `/login` had succeeded.
    pub fn sign_in(&self, email: &str) {
        let mut data = self.state.data();
        let user = data
            .users
            .iter()
            .find(|(u, _)| u["email"] == email)
            .map(|(u, _)| u.clone());
        data.session = user;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// ═══════════════════════════════════════════════════════════
// State
// ═══════════════════════════════════════════════════════════

struct MockState {
    data: Mutex<MockData>,
}

#[derive(Default)]
struct MockData {
    hits: HashMap<String, usize>,
    bodies: HashMap<String, Value>,
    queries: HashMap<String, String>,
    last_xsrf: Option<String>,
    failures: HashMap<String, (u16, Value)>,
    delays: HashMap<String, Duration>,
    users: Vec<(Value, String)>,
    session: Option<Value>,
    patients: Vec<Value>,
    visites: Vec<Value>,
    dossiers: Vec<Value>,
    medecins: Vec<Value>,
    profile: Value,
    workflows: Vec<Value>,
    dashboard: Value,
    next_id: u64,
}

impl MockData {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MockState {
    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn seeded() -> Self {
        let verified = "2024-01-01T00:00:00.000000Z";
        let users = vec![
            (
                json!({"id": 1, "name": "Admin MRC", "email": ADMIN_EMAIL, "role": "admin", "email_verified_at": verified}),
                PASSWORD.to_string(),
            ),
            (
                json!({"id": 2, "name": "Martin Jean", "email": DOCTOR_EMAIL, "role": "medecin", "email_verified_at": verified}),
                PASSWORD.to_string(),
            ),
            (
                json!({"id": 3, "name": "Petit Luc", "email": UNVERIFIED_EMAIL, "role": "medecin", "email_verified_at": null}),
                PASSWORD.to_string(),
            ),
        ];

        let patients = vec![
            json!({
                "id": 12, "nom": "Dupont", "prenom": "Marie", "date_naissance": "1958-04-12T00:00:00.000000Z",
                "sexe": "F", "adresse": "3 rue des Lilas, Lyon", "telephone": "0601020304",
                "email": "marie.dupont@example.fr", "numero_secu": "2580412345678", "stade": "3",
                "medecin_referent": "Dr Martin",
                "antecedents": [{"categorie": "maladies_chroniques", "details": "Hypertension"}],
                "traitements": [{"categorie": "medicaments", "details": "Ramipril", "posologie": "5mg/j"}],
                "dossier": {"id": 4, "numero_dossier": "DOS-2024-004", "status": "en_cours"}
            }),
            json!({
                "id": 13, "nom": "Martin", "prenom": "Paul", "date_naissance": "1970-09-30",
                "sexe": "M", "numero_secu": "1700975123456", "stade": 2,
                "antecedents": [], "traitements": [],
                "dossier": {"id": 5, "numero_dossier": "DOS-2024-005", "status": "stable"}
            }),
            json!({
                "id": 14, "nom": "Durand", "prenom": "Luc", "date_naissance": "1949-12-01",
                "sexe": "M", "numero_secu": "1491233222111", "stade": 4,
                "antecedents": [], "traitements": null,
                "dossier": {"id": 6, "numero_dossier": "DOS-2024-006", "status": "urgent"}
            }),
        ];

        let visites = vec![
            json!({
                "id": 1, "patient_id": 12, "date": "2024-01-10", "heure": "09:00",
                "medecin": "Dr Martin", "motif": "Bilan initial", "status": "terminé",
                "notes": "Fonction rénale stable",
                "examens": [{"type": "Échographie rénale", "resultat": "Reins de taille normale"}],
                "biologie": [{"type": "Créatinine", "resultat": "180 µmol/L"}],
                "prescriptions": [{"medicament": "Ramipril", "posologie": "5mg/j"}]
            }),
            json!({
                "id": 2, "patient_id": 12, "date": "2024-02-15", "heure": "10:30",
                "medecin": "Dr Martin", "motif": "Suivi trimestriel", "status": "planifié",
                "notes": "", "examens": [],
                "biologie": [{"type": "Kaliémie", "resultat": "en attente"}],
                "prescriptions": []
            }),
            json!({
                "id": 3, "patient_id": 12, "date": "2024-03-01", "heure": "14:00",
                "medecin": "Dr Martin", "motif": "Contrôle", "status": "annulé",
                "notes": "Patient absent",
                "examens": [{"type": "ECG", "resultat": "en attente"}],
                "biologie": [],
                "prescriptions": [{"medicament": "Furosémide", "posologie": "40mg/j"}]
            }),
        ];

        let dossiers = vec![
            json!({"id": 4, "numero_dossier": "DOS-2024-004", "status": "en_cours",
                   "patient": {"id": 12, "nom": "Dupont", "prenom": "Marie"},
                   "created_at": "2024-01-10T08:00:00.000000Z", "updated_at": "2024-02-15T08:00:00.000000Z"}),
            json!({"id": 5, "numero_dossier": "DOS-2024-005", "status": "stable",
                   "patient": {"id": 13, "nom": "Martin", "prenom": "Paul"},
                   "created_at": "2024-01-12T08:00:00.000000Z", "updated_at": "2024-01-12T08:00:00.000000Z"}),
            json!({"id": 6, "numero_dossier": "DOS-2024-006", "status": "urgent",
                   "patient": {"id": 14, "nom": "Durand", "prenom": "Luc"},
                   "created_at": "2024-01-20T08:00:00.000000Z", "updated_at": "2024-03-02T08:00:00.000000Z"}),
        ];

        let medecins = vec![
            json!({"id": 2, "name": "Martin Jean", "email": DOCTOR_EMAIL, "specialite": "Néphrologie",
                   "created_at": "2024-01-05T10:00:00.000000Z", "has_patients": true}),
            json!({"id": 7, "name": "Durand Anne Sophie", "email": "a.durand@mrc.fr", "specialite": "Cardiologie",
                   "created_at": "2024-02-05T10:00:00.000000Z", "has_patients": false}),
        ];

        let workflows = vec![
            json!({"id": 1, "nom": "Suivi stade 3", "description": "Surveillance trimestrielle", "stade": 3,
                   "examens_reguliers": [{"type": "Créatinine", "frequence": "3 mois"}],
                   "alertes": [{"indicateur": "DFG", "condition": "< 30", "message": "Passage en stade 4"}]}),
            json!({"id": 2, "nom": "Pré-dialyse", "description": "Préparation à la dialyse", "stade": "4",
                   "examens_reguliers": [], "alertes": []}),
        ];

        let dashboard = json!({
            "patients": {"total": 3, "byStage": {"stade1": 0, "stade2": 1, "stade3": 1, "stade4": 1, "stade5": 0}},
            "alerts": {"total": 1, "items": [
                {"id": 9, "patient_id": 14, "patient_nom": "Durand Luc", "numero_dossier": "DOS-2024-006",
                 "date": "2024-03-02", "motif": "Kaliémie élevée"}
            ]},
            "appointments": {"today": 1, "upcoming": 2, "items": [], "todayItems": [
                {"id": 2, "patient_id": 12, "patient_nom": "Dupont Marie", "numero_dossier": "DOS-2024-004",
                 "heure": "10:30", "motif": "Suivi trimestriel", "status": "planifié"}
            ]},
            "evolution": [
                {"month": "Jan", "stade1": 0, "stade2": 1, "stade3": 1, "stade4": 0, "stade5": 0},
                {"month": "Fév", "stade1": 0, "stade2": 1, "stade3": 1, "stade4": 1, "stade5": 0}
            ]
        });

        Self {
            data: Mutex::new(MockData {
                users,
                patients,
                visites,
                dossiers,
                medecins,
                profile: json!({"id": 2, "name": "Martin Jean", "email": DOCTOR_EMAIL,
                                "specialite": "Néphrologie", "preferences_notifications": []}),
                workflows,
                dashboard,
                next_id: 100,
                ..MockData::default()
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Routing
// ═══════════════════════════════════════════════════════════

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let route = format!("{method} {path}");
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let query = uri.query().unwrap_or_default().to_string();

    let (response, delay) = {
        let mut data = state.data();
        *data.hits.entry(route.clone()).or_default() += 1;
        data.bodies.insert(route.clone(), body.clone());
        data.queries.insert(route.clone(), query.clone());
        if method != Method::GET {
            data.last_xsrf = headers
                .get("X-XSRF-TOKEN")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
        }
        let delay = data.delays.get(&route).copied();

        let response = match data.failures.get(&route).cloned() {
            Some((status, body)) => reply(status, body),
            None => {
                let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
                dispatch(&mut data, &method, &segments, &query, &headers, body)
            }
        };
        (response, delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    response
}

fn dispatch(
    data: &mut MockData,
    method: &Method,
    segments: &[&str],
    query: &str,
    headers: &HeaderMap,
    body: Value,
) -> Response {
    match (method.as_str(), segments) {
        // ── Auth ────────────────────────────────────────────
        ("GET", ["sanctum", "csrf-cookie"]) => {
            (StatusCode::NO_CONTENT, [(header::SET_COOKIE, XSRF_COOKIE)]).into_response()
        }
        ("POST", ["login"]) => login(data, headers, &body),
        ("POST", ["logout"]) => {
            data.session = None;
            StatusCode::NO_CONTENT.into_response()
        }
        ("GET", ["api", "user"]) => match &data.session {
            Some(user) => reply(200, user.clone()),
            None => reply(401, json!({"message": "Unauthenticated."})),
        },
        ("POST", ["email", "verification-notification"]) => match &data.session {
            Some(_) => reply(202, json!({"status": "verification-link-sent"})),
            None => reply(401, json!({"message": "Unauthenticated."})),
        },

        // ── Dashboard ───────────────────────────────────────
        ("GET", ["api", "dashboard"]) => reply(200, data.dashboard.clone()),

        // ── Patients & visites ──────────────────────────────
        ("GET", ["api", "patients", "all"]) => reply(200, json!({"patients": data.patients})),
        ("POST", ["api", "patients"]) => create_patient(data, body),
        ("GET", ["api", "patients", id]) => match find(&data.patients, id) {
            Some(i) => reply(200, data.patients[i].clone()),
            None => patient_not_found(),
        },
        ("PUT", ["api", "patients", id]) => match find(&data.patients, id) {
            Some(i) => {
                merge(&mut data.patients[i], body);
                reply(200, json!({"patient": data.patients[i]}))
            }
            None => patient_not_found(),
        },
        ("DELETE", ["api", "patients", id]) => match find(&data.patients, id) {
            Some(i) => {
                data.patients.remove(i);
                reply(200, json!({"message": "Patient supprimé"}))
            }
            None => patient_not_found(),
        },
        ("GET", ["api", "patients", id, "visites"]) => {
            if find(&data.patients, id).is_none() {
                return patient_not_found();
            }
            let pid: u64 = id.parse().unwrap_or_default();
            let list: Vec<Value> = data
                .visites
                .iter()
                .filter(|v| v["patient_id"] == pid)
                .cloned()
                .collect();
            reply(200, Value::Array(list))
        }
        ("POST", ["api", "visites"]) => {
            if let Some(resp) = require(&body, &["medecin", "motif", "patient_id"]) {
                return resp;
            }
            let mut visite = body;
            visite["id"] = json!(data.next_id());
            data.visites.push(visite.clone());
            reply(201, json!({"visite": visite}))
        }
        ("PUT", ["api", "visites", id]) => match find(&data.visites, id) {
            Some(i) => {
                merge(&mut data.visites[i], body);
                reply(200, json!({"visite": data.visites[i]}))
            }
            None => reply(404, json!({"message": "Visite introuvable"})),
        },

        // ── Dossiers ────────────────────────────────────────
        ("GET", ["api", "dossiers"]) => list_dossiers(data, query),
        ("GET", ["api", "dossiers", id]) => match find(&data.dossiers, id) {
            Some(i) => reply(200, json!({"dossier": data.dossiers[i]})),
            None => reply(404, json!({"message": "Dossier introuvable"})),
        },
        ("PATCH", ["api", "dossiers", id, "status"]) => {
            let status = body["status"].as_str().unwrap_or_default();
            if !["urgent", "en_cours", "stable"].contains(&status) {
                return invalid("status", "Le statut sélectionné est invalide.");
            }
            match find(&data.dossiers, id) {
                Some(i) => {
                    data.dossiers[i]["status"] = json!(status);
                    data.dossiers[i]["updated_at"] = json!(chrono::Utc::now().to_rfc3339());
                    reply(200, json!({"dossier": data.dossiers[i]}))
                }
                None => reply(404, json!({"message": "Dossier introuvable"})),
            }
        }

        // ── Admin: doctors ──────────────────────────────────
        ("GET", ["api", "admin", "medecins"]) => reply(200, json!({"medecins": data.medecins})),
        ("POST", ["api", "admin", "medecins"]) => create_medecin(data, body),
        ("PUT", ["api", "admin", "medecins", id]) => match find(&data.medecins, id) {
            Some(i) => {
                merge(&mut data.medecins[i], body);
                reply(200, json!({"medecin": data.medecins[i]}))
            }
            None => reply(404, json!({"message": "Médecin introuvable"})),
        },
        ("DELETE", ["api", "admin", "medecins", id]) => match find(&data.medecins, id) {
            Some(i) if data.medecins[i]["has_patients"] == true => reply(
                400,
                json!({"message": "Ce médecin a des patients associés et ne peut pas être supprimé"}),
            ),
            Some(i) => {
                data.medecins.remove(i);
                reply(200, json!({"message": "Médecin supprimé"}))
            }
            None => reply(404, json!({"message": "Médecin introuvable"})),
        },
        ("PUT", ["api", "admin", "medecins", id, "password"]) => {
            if find(&data.medecins, id).is_none() {
                return reply(404, json!({"message": "Médecin introuvable"}));
            }
            check_new_password(&body)
                .unwrap_or_else(|| reply(200, json!({"message": "Mot de passe mis à jour"})))
        }

        // ── Own profile ─────────────────────────────────────
        ("GET", ["api", "medecin", "profile"]) => reply(200, json!({"medecin": data.profile})),
        ("PUT", ["api", "medecin", "profile"]) => {
            merge(&mut data.profile, body);
            reply(200, json!({"medecin": data.profile}))
        }
        ("PUT", ["api", "medecin", "password"]) => {
            if body["current_password"] != PASSWORD {
                return invalid("current_password", "Le mot de passe actuel est incorrect.");
            }
            check_new_password(&body)
                .unwrap_or_else(|| reply(200, json!({"message": "Mot de passe mis à jour"})))
        }

        // ── Workflows ───────────────────────────────────────
        ("GET", ["api", "workflows"]) => reply(200, json!({"workflows": data.workflows})),
        ("POST", ["api", "workflows"]) => {
            if let Some(resp) = require(&body, &["nom", "stade"]) {
                return resp;
            }
            let mut workflow = body;
            workflow["id"] = json!(data.next_id());
            data.workflows.push(workflow.clone());
            reply(201, json!({"workflow": workflow}))
        }
        ("PUT", ["api", "workflows", id]) => match find(&data.workflows, id) {
            Some(i) => {
                merge(&mut data.workflows[i], body);
                reply(200, json!({"workflow": data.workflows[i]}))
            }
            None => reply(404, json!({"message": "Workflow introuvable"})),
        },
        ("DELETE", ["api", "workflows", id]) => match find(&data.workflows, id) {
            Some(i) => {
                data.workflows.remove(i);
                reply(200, json!({"message": "Workflow supprimé"}))
            }
            None => reply(404, json!({"message": "Workflow introuvable"})),
        },
        ("POST", ["api", "workflows", id, "assign"]) => {
            if find(&data.workflows, id).is_none() {
                return reply(404, json!({"message": "Workflow introuvable"}));
            }
            let patient = body["patient_id"].to_string().trim_matches('"').to_string();
            match find(&data.patients, &patient) {
                Some(_) => reply(200, json!({"message": "Workflow assigné"})),
                None => invalid("patient_id", "Le patient sélectionné est invalide."),
            }
        }

        _ => reply(404, json!({"message": "Not Found"})),
    }
}

// ═══════════════════════════════════════════════════════════
// Handlers
// ═══════════════════════════════════════════════════════════

fn login(data: &mut MockData, headers: &HeaderMap, body: &Value) -> Response {
    let xsrf = headers.get("X-XSRF-TOKEN").and_then(|v| v.to_str().ok());
    if xsrf != Some(XSRF_VALUE) {
        return reply(419, json!({"message": "CSRF token mismatch."}));
    }
    if let Some(resp) = require(body, &["email", "password"]) {
        return resp;
    }
    let account = data
        .users
        .iter()
        .find(|(u, pwd)| u["email"] == body["email"] && body["password"] == pwd.as_str())
        .map(|(u, _)| u.clone());
    match account {
        Some(user) => {
            data.session = Some(user);
            StatusCode::NO_CONTENT.into_response()
        }
        None => invalid("email", "Ces identifiants ne correspondent pas à nos enregistrements."),
    }
}

fn create_patient(data: &mut MockData, body: Value) -> Response {
    if let Some(resp) = require(&body, &["nom", "prenom", "date_naissance", "numero_secu"]) {
        return resp;
    }
    if data
        .patients
        .iter()
        .any(|p| p["numero_secu"] == body["numero_secu"])
    {
        return invalid(
            "numero_secu",
            "Le numéro de sécurité sociale est déjà utilisé.",
        );
    }
    let mut patient = body;
    patient["id"] = json!(data.next_id());
    data.patients.push(patient.clone());
    reply(201, json!({"patient": patient}))
}

fn create_medecin(data: &mut MockData, body: Value) -> Response {
    if let Some(resp) = require(&body, &["name", "email", "password", "specialite"]) {
        return resp;
    }
    if data.medecins.iter().any(|m| m["email"] == body["email"]) {
        return invalid("email", "L'adresse email est déjà utilisée.");
    }
    if body["password"].as_str().map_or(0, |p| p.chars().count()) < 8 {
        return invalid("password", "Le mot de passe doit contenir au moins 8 caractères.");
    }
    let id = data.next_id();
    let medecin = json!({
        "id": id,
        "name": body["name"],
        "email": body["email"],
        "specialite": body["specialite"],
        "created_at": chrono::Utc::now().to_rfc3339(),
        "has_patients": false,
    });
    data.medecins.push(medecin.clone());
    reply(201, json!({"medecin": medecin}))
}

fn list_dossiers(data: &MockData, query: &str) -> Response {
    let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let search = params.get("search").map(|s| s.to_lowercase());
    let patient_id = params.get("patient_id").and_then(|p| p.parse::<u64>().ok());

    let list: Vec<Value> = data
        .dossiers
        .iter()
        .filter(|d| patient_id.map_or(true, |pid| d["patient"]["id"] == pid))
        .filter(|d| {
            search.as_deref().map_or(true, |s| {
                let text = format!(
                    "{} {} {}",
                    d["numero_dossier"].as_str().unwrap_or_default(),
                    d["patient"]["nom"].as_str().unwrap_or_default(),
                    d["patient"]["prenom"].as_str().unwrap_or_default()
                );
                text.to_lowercase().contains(s)
            })
        })
        .cloned()
        .collect();
    reply(200, json!({"dossiers": {"data": list, "current_page": 1}}))
}

fn check_new_password(body: &Value) -> Option<Response> {
    let password = body["password"].as_str().unwrap_or_default();
    if password.chars().count() < 8 {
        return Some(invalid(
            "password",
            "Le mot de passe doit contenir au moins 8 caractères.",
        ));
    }
    if body["password_confirmation"] != password {
        return Some(invalid(
            "password",
            "La confirmation du mot de passe ne correspond pas.",
        ));
    }
    None
}

// ── Helpers ─────────────────────────────────────────────────

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

fn invalid(field: &str, message: &str) -> Response {
    let mut errors = Map::new();
    errors.insert(field.to_string(), json!([message]));
    reply(422, json!({"message": message, "errors": errors}))
}

fn patient_not_found() -> Response {
    reply(404, json!({"message": "Patient introuvable"}))
}

/// 422 naming every missing or blank field, Laravel style.
fn require(body: &Value, fields: &[&str]) -> Option<Response> {
    let mut errors = Map::new();
    for field in fields {
        let missing = match &body[*field] {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            errors.insert(
                field.to_string(),
                json!([format!("Le champ {field} est obligatoire.")]),
            );
        }
    }
    if errors.is_empty() {
        return None;
    }
    Some(reply(
        422,
        json!({"message": "Les données fournies sont invalides.", "errors": errors}),
    ))
}

fn find(list: &[Value], id: &str) -> Option<usize> {
    let id: u64 = id.parse().ok()?;
    list.iter().position(|item| match &item["id"] {
        Value::Number(n) => n.as_u64() == Some(id),
        Value::String(s) => s.parse::<u64>().ok() == Some(id),
        _ => false,
    })
}

fn merge(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            if key != "id" {
                target.insert(key, value);
            }
        }
    }
}
