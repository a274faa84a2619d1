#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clinicAgenda::clients::api_client::ApiError;
use clinicAgenda::models::client::{Client, ClientDraft, ClientId};
use clinicAgenda::models::evaluation::{Evaluation, EvaluationDraft, EvaluationId};
use clinicAgenda::models::session::{Session, SessionDraft, SessionId, SessionStatus};
use clinicAgenda::service::repository::ClinicRepository;

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
}

pub fn session(id: SessionId, client_id: ClientId, start: NaiveDateTime) -> Session {
    Session {
        id,
        client_id,
        start,
        end: start + chrono::Duration::hours(1),
        status: SessionStatus::Scheduled,
        name: "Sessão de Fisioterapia".to_string(),
        notes: None,
    }
}

pub fn client(id: ClientId, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        email: String::new(),
        phone: String::new(),
        birth_date: None,
        registered_at: None,
        sex: String::new(),
        profession: String::new(),
        neighborhood: String::new(),
        city: String::new(),
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "boom".to_string(),
    }
}

/// In-memory repository that records every call it receives.
pub struct FakeRepository {
    pub sessions: Mutex<Vec<Session>>,
    pub clients: Vec<Client>,
    pub calls: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

impl FakeRepository {
    pub fn new(sessions: Vec<Session>, clients: Vec<Client>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            clients,
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if *self.fail.lock().unwrap() {
            return Err(server_error());
        }
        Ok(())
    }

    fn stored(&self, id: SessionId, draft: &SessionDraft) -> Session {
        Session {
            id,
            client_id: draft.client_id,
            start: draft.start,
            end: draft.end,
            status: draft.status,
            name: draft.name.clone(),
            notes: Some(draft.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

#[async_trait]
impl ClinicRepository for FakeRepository {
    async fn list_clients(&self, _name: Option<&str>) -> Result<Vec<Client>, ApiError> {
        self.record("GET /clientes".to_string())?;
        Ok(self.clients.clone())
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, ApiError> {
        self.record(format!("GET /clientes/{id}"))?;
        self.clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::NotFound {
                path: format!("/clientes/{id}"),
            })
    }

    async fn create_client(&self, _draft: &ClientDraft) -> Result<Client, ApiError> {
        self.record("POST /clientes".to_string())?;
        Ok(client(100, "novo"))
    }

    async fn update_client(&self, id: ClientId, _draft: &ClientDraft) -> Result<Client, ApiError> {
        self.record(format!("PUT /clientes/{id}"))?;
        Ok(client(id, "atualizado"))
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), ApiError> {
        self.record(format!("DELETE /clientes/{id}"))
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        self.record("GET /sessoes".to_string())?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn list_sessions_for_client(&self, client_id: ClientId) -> Result<Vec<Session>, ApiError> {
        self.record(format!("GET /sessoes/cliente/{client_id}"))?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create_session(&self, draft: &SessionDraft) -> Result<Session, ApiError> {
        self.record(format!("POST /sessoes/cliente/{}", draft.client_id))?;
        let mut sessions = self.sessions.lock().unwrap();
        let id = sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let created = self.stored(id, draft);
        sessions.push(created.clone());
        Ok(created)
    }

    async fn update_session(&self, id: SessionId, draft: &SessionDraft) -> Result<Session, ApiError> {
        self.record(format!("PUT /sessoes/{id}"))?;
        let updated = self.stored(id, draft);
        let mut sessions = self.sessions.lock().unwrap();
        for session in sessions.iter_mut().filter(|s| s.id == id) {
            *session = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), ApiError> {
        self.record(format!("DELETE /sessoes/{id}"))?;
        self.sessions.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn list_evaluations(&self, client_id: ClientId) -> Result<Vec<Evaluation>, ApiError> {
        self.record(format!("GET /avaliacoes/cliente/{client_id}"))?;
        Ok(Vec::new())
    }

    async fn create_evaluation(&self, draft: &EvaluationDraft) -> Result<Evaluation, ApiError> {
        self.record(format!("POST /avaliacoes/cliente/{}", draft.client_id))?;
        Err(server_error())
    }

    async fn update_evaluation(
        &self,
        id: EvaluationId,
        _draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        self.record(format!("PUT /avaliacoes/{id}"))?;
        Err(server_error())
    }

    async fn delete_evaluation(&self, id: EvaluationId) -> Result<(), ApiError> {
        self.record(format!("DELETE /avaliacoes/{id}"))
    }

    async fn add_evolution(&self, id: EvaluationId, _text: &str) -> Result<Evaluation, ApiError> {
        self.record(format!("POST /avaliacoes/{id}/evolucoes"))?;
        Err(server_error())
    }
}
