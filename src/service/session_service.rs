use tracing::info;

use crate::clients::api_client::ApiError;
use crate::models::session::{DraftError, Session, SessionDraft, SessionId, SessionStatus};
use crate::service::repository::ClinicRepository;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct SessionService;

impl SessionService {
    /// Updates `existing` when given, otherwise books a new session.
    pub async fn save<R: ClinicRepository + ?Sized>(
        repo: &R,
        existing: Option<SessionId>,
        draft: &SessionDraft,
    ) -> Result<Session, SaveError> {
        draft.validate()?;
        let saved = match existing {
            Some(id) => repo.update_session(id, draft).await?,
            None => repo.create_session(draft).await?,
        };
        info!(session = saved.id, client = saved.client_id, "session saved");
        Ok(saved)
    }

    pub async fn set_status<R: ClinicRepository + ?Sized>(
        repo: &R,
        session: &Session,
        status: SessionStatus,
    ) -> Result<Session, ApiError> {
        let mut draft = session.to_draft();
        draft.status = status;
        let saved = repo.update_session(session.id, &draft).await?;
        info!(session = saved.id, status = status.wire_name(), "session status changed");
        Ok(saved)
    }
}
