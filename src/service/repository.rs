use async_trait::async_trait;

use crate::clients::api_client::{ApiClient, ApiError};
use crate::models::client::{Client, ClientDraft, ClientId};
use crate::models::evaluation::{Evaluation, EvaluationDraft, EvaluationId};
use crate::models::session::{Session, SessionDraft, SessionId};

/// Remote record access the views depend on. Every failure comes back as an
/// `ApiError`; callers keep their previous state when that happens.
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn list_clients(&self, name: Option<&str>) -> Result<Vec<Client>, ApiError>;
    async fn get_client(&self, id: ClientId) -> Result<Client, ApiError>;
    async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ApiError>;
    async fn update_client(&self, id: ClientId, draft: &ClientDraft) -> Result<Client, ApiError>;
    async fn delete_client(&self, id: ClientId) -> Result<(), ApiError>;

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError>;
    async fn list_sessions_for_client(&self, client_id: ClientId) -> Result<Vec<Session>, ApiError>;
    async fn create_session(&self, draft: &SessionDraft) -> Result<Session, ApiError>;
    async fn update_session(&self, id: SessionId, draft: &SessionDraft) -> Result<Session, ApiError>;
    async fn delete_session(&self, id: SessionId) -> Result<(), ApiError>;

    async fn list_evaluations(&self, client_id: ClientId) -> Result<Vec<Evaluation>, ApiError>;
    async fn create_evaluation(&self, draft: &EvaluationDraft) -> Result<Evaluation, ApiError>;
    async fn update_evaluation(
        &self,
        id: EvaluationId,
        draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError>;
    async fn delete_evaluation(&self, id: EvaluationId) -> Result<(), ApiError>;
    async fn add_evolution(&self, id: EvaluationId, text: &str) -> Result<Evaluation, ApiError>;
}

#[async_trait]
impl ClinicRepository for ApiClient {
    async fn list_clients(&self, name: Option<&str>) -> Result<Vec<Client>, ApiError> {
        ApiClient::list_clients(self, name).await
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, ApiError> {
        ApiClient::get_client(self, id).await
    }

    async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ApiError> {
        ApiClient::create_client(self, draft).await
    }

    async fn update_client(&self, id: ClientId, draft: &ClientDraft) -> Result<Client, ApiError> {
        ApiClient::update_client(self, id, draft).await
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), ApiError> {
        ApiClient::delete_client(self, id).await
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        ApiClient::list_sessions(self).await
    }

    async fn list_sessions_for_client(&self, client_id: ClientId) -> Result<Vec<Session>, ApiError> {
        ApiClient::list_sessions_for_client(self, client_id).await
    }

    async fn create_session(&self, draft: &SessionDraft) -> Result<Session, ApiError> {
        ApiClient::create_session(self, draft).await
    }

    async fn update_session(&self, id: SessionId, draft: &SessionDraft) -> Result<Session, ApiError> {
        ApiClient::update_session(self, id, draft).await
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), ApiError> {
        ApiClient::delete_session(self, id).await
    }

    async fn list_evaluations(&self, client_id: ClientId) -> Result<Vec<Evaluation>, ApiError> {
        ApiClient::list_evaluations(self, client_id).await
    }

    async fn create_evaluation(&self, draft: &EvaluationDraft) -> Result<Evaluation, ApiError> {
        ApiClient::create_evaluation(self, draft).await
    }

    async fn update_evaluation(
        &self,
        id: EvaluationId,
        draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        ApiClient::update_evaluation(self, id, draft).await
    }

    async fn delete_evaluation(&self, id: EvaluationId) -> Result<(), ApiError> {
        ApiClient::delete_evaluation(self, id).await
    }

    async fn add_evolution(&self, id: EvaluationId, text: &str) -> Result<Evaluation, ApiError> {
        ApiClient::add_evolution(self, id, text).await
    }
}
