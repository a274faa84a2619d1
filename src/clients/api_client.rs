use std::time::Duration;

use chrono_tz::Tz;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::auth::AuthSession;
use crate::models::client::{Client, ClientDraft, ClientId};
use crate::models::evaluation::{Evaluation, EvaluationDraft, EvaluationId};
use crate::models::session::{NormalizeError, RawSession, Session, SessionDraft, SessionId};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the clinic API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("rejected by the server ({status}): {body}")]
    Validation { status: u16, body: String },
    #[error("unauthorized ({status}), log in again")]
    Unauthorized { status: u16 },
    #[error("server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }
}

/// HTTP client for the clinic backend.
///
/// All paths live under `{base_url}/api`. The bearer token comes from the
/// `AuthSession` handed in at construction and is attached to every request.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth: Option<AuthSession>,
    timezone: Tz,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth: Option<AuthSession>,
        timezone: Tz,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, auth, timezone))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        auth: Option<AuthSession>,
        timezone: Tz,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            timezone,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.auth {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send_raw(path, builder).await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn send_raw(&self, path: &str, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, status = status.as_u16(), "clinic api response");
        if status.is_success() {
            return Ok(body);
        }
        warn!(path, status = status.as_u16(), "clinic api request failed");
        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound {
                path: path.to_string(),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
                ApiError::Validation {
                    status: status.as_u16(),
                    body,
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
            },
            _ => ApiError::Status {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, self.request(Method::GET, path)).await
    }

    async fn write<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(path, self.request(method, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_raw(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn normalize(&self, raw: RawSession) -> Result<Session, ApiError> {
        Ok(raw.normalize(&self.timezone)?)
    }

    fn normalize_all(&self, raw: Vec<RawSession>) -> Result<Vec<Session>, ApiError> {
        raw.into_iter().map(|r| self.normalize(r)).collect()
    }

    // Clients

    pub async fn list_clients(&self, name: Option<&str>) -> Result<Vec<Client>, ApiError> {
        let path = "/clientes";
        let mut builder = self.request(Method::GET, path);
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            builder = builder.query(&[("nome", name)]);
        }
        self.send(path, builder).await
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client, ApiError> {
        self.get(&format!("/clientes/{id}")).await
    }

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ApiError> {
        self.write(Method::POST, "/clientes", draft).await
    }

    pub async fn update_client(&self, id: ClientId, draft: &ClientDraft) -> Result<Client, ApiError> {
        self.write(Method::PUT, &format!("/clientes/{id}"), draft).await
    }

    pub async fn delete_client(&self, id: ClientId) -> Result<(), ApiError> {
        self.delete(&format!("/clientes/{id}")).await
    }

    // Sessions

    pub async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let raw: Vec<RawSession> = self.get("/sessoes").await?;
        self.normalize_all(raw)
    }

    pub async fn list_sessions_for_client(&self, client_id: ClientId) -> Result<Vec<Session>, ApiError> {
        let raw: Vec<RawSession> = self.get(&format!("/sessoes/cliente/{client_id}")).await?;
        self.normalize_all(raw)
    }

    pub async fn create_session(&self, draft: &SessionDraft) -> Result<Session, ApiError> {
        let path = format!("/sessoes/cliente/{}", draft.client_id);
        let raw: RawSession = self.write(Method::POST, &path, draft).await?;
        self.normalize(raw)
    }

    pub async fn update_session(&self, id: SessionId, draft: &SessionDraft) -> Result<Session, ApiError> {
        let raw: RawSession = self.write(Method::PUT, &format!("/sessoes/{id}"), draft).await?;
        self.normalize(raw)
    }

    pub async fn delete_session(&self, id: SessionId) -> Result<(), ApiError> {
        self.delete(&format!("/sessoes/{id}")).await
    }

    // Evaluations

    pub async fn list_evaluations(&self, client_id: ClientId) -> Result<Vec<Evaluation>, ApiError> {
        self.get(&format!("/avaliacoes/cliente/{client_id}")).await
    }

    pub async fn create_evaluation(&self, draft: &EvaluationDraft) -> Result<Evaluation, ApiError> {
        let path = format!("/avaliacoes/cliente/{}", draft.client_id);
        self.write(Method::POST, &path, draft).await
    }

    pub async fn update_evaluation(
        &self,
        id: EvaluationId,
        draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        self.write(Method::PUT, &format!("/avaliacoes/{id}"), draft).await
    }

    pub async fn delete_evaluation(&self, id: EvaluationId) -> Result<(), ApiError> {
        self.delete(&format!("/avaliacoes/{id}")).await
    }

    pub async fn add_evolution(&self, id: EvaluationId, text: &str) -> Result<Evaluation, ApiError> {
        let body = serde_json::json!({ "evolucao": text });
        self.write(Method::POST, &format!("/avaliacoes/{id}/evolucoes"), &body).await
    }
}
