mod common;

use chrono::NaiveDate;
use clinicAgenda::models::session::{SessionDraft, SessionStatus};
use clinicAgenda::service::session_service::{SaveError, SessionService};
use common::{FakeRepository, at, session};

#[tokio::test]
async fn save_without_id_books_a_new_session() {
    let repo = FakeRepository::new(vec![session(4, 1, at(2026, 10, 16, 9, 0))], vec![]);
    let draft = SessionDraft::new(7, NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());

    let saved = SessionService::save(&repo, None, &draft).await.unwrap();
    assert_eq!(saved.id, 5);
    assert_eq!(saved.start, at(2026, 10, 21, 9, 0));
    assert_eq!(repo.calls(), vec!["POST /sessoes/cliente/7".to_string()]);
}

#[tokio::test]
async fn save_with_id_updates() {
    let existing = session(4, 1, at(2026, 10, 16, 9, 0));
    let repo = FakeRepository::new(vec![existing.clone()], vec![]);
    let mut draft = existing.to_draft();
    draft.notes = "trazer exames".to_string();

    let saved = SessionService::save(&repo, Some(4), &draft).await.unwrap();
    assert_eq!(saved.notes.as_deref(), Some("trazer exames"));
    assert_eq!(repo.calls(), vec!["PUT /sessoes/4".to_string()]);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_server() {
    let repo = FakeRepository::new(vec![], vec![]);
    let mut draft = SessionDraft::new(7, NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());
    draft.end = at(2026, 10, 21, 8, 0);

    let err = SessionService::save(&repo, None, &draft).await.unwrap_err();
    assert!(matches!(err, SaveError::Invalid(_)));
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn set_status_changes_only_the_status() {
    let existing = session(4, 1, at(2026, 10, 16, 9, 0));
    let repo = FakeRepository::new(vec![existing.clone()], vec![]);

    let saved = SessionService::set_status(&repo, &existing, SessionStatus::Completed)
        .await
        .unwrap();
    assert_eq!(saved.status, SessionStatus::Completed);
    assert_eq!(saved.start, existing.start);
    assert_eq!(saved.client_id, existing.client_id);
}
