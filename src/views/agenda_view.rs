use std::fmt::Write;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::clients::api_client::ApiError;
use crate::locale::Language;
use crate::models::client::{Client, ClientDirectory};
use crate::models::session::{Session, SessionId};
use crate::service::agenda::{FilterMode, LabeledDay, build_agenda};
use crate::service::repository::ClinicRepository;

/// Identifies one load cycle; results from an older cycle are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Local state behind the agenda screen.
#[derive(Debug, Default)]
pub struct AgendaView {
    sessions: Vec<Session>,
    directory: ClientDirectory,
    filter: FilterMode,
    loading: bool,
    pending_delete: Option<SessionId>,
    generation: u64,
}

impl AgendaView {
    pub fn new(filter: FilterMode) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn directory(&self) -> &ClientDirectory {
        &self.directory
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_delete(&self) -> Option<SessionId> {
        self.pending_delete
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Applies a finished load. Returns `Ok(false)` when the ticket is stale.
    /// On error the previously loaded data is kept.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<(Vec<Session>, Vec<Client>), ApiError>,
    ) -> Result<bool, ApiError> {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale agenda load");
            return Ok(false);
        }
        self.loading = false;
        let (sessions, clients) = result?;
        debug!(sessions = sessions.len(), clients = clients.len(), "agenda loaded");
        self.sessions = sessions;
        self.directory = ClientDirectory::new(&clients);
        Ok(true)
    }

    pub async fn refresh<R: ClinicRepository + ?Sized>(&mut self, repo: &R) -> Result<(), ApiError> {
        let ticket = self.begin_load();
        let result = tokio::try_join!(repo.list_sessions(), repo.list_clients(None));
        self.finish_load(ticket, result).map(|_| ())
    }

    /// First step of a delete. No request is made here.
    pub fn request_delete(&mut self, id: SessionId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: deletes the pending session, if any. The pending id is
    /// cleared whatever the outcome; local data only changes on success.
    pub async fn confirm_delete<R: ClinicRepository + ?Sized>(
        &mut self,
        repo: &R,
    ) -> Result<Option<SessionId>, ApiError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };
        repo.delete_session(id).await?;
        self.sessions.retain(|session| session.id != id);
        info!(session = id, "session deleted");
        Ok(Some(id))
    }

    pub fn days(&self, now: NaiveDateTime, language: Language) -> Vec<LabeledDay> {
        build_agenda(&self.sessions, self.filter, now, language)
    }

    pub fn render(&self, now: NaiveDateTime, language: Language) -> String {
        if self.loading {
            return format!("{}\n", language.loading());
        }
        let days = self.days(now, language);
        if days.is_empty() {
            return format!("{}\n{}\n", language.empty_agenda(), language.empty_agenda_hint());
        }
        let mut out = String::new();
        for day in days {
            let _ = writeln!(out, "{}", day.label);
            for session in &day.bucket.sessions {
                let _ = writeln!(
                    out,
                    "  #{:<4} {} - {}  {}  [{}]",
                    session.id,
                    session.start.format("%H:%M"),
                    session.end.format("%H:%M"),
                    self.directory.name_of(session.client_id),
                    session.status.wire_name(),
                );
                if let Some(notes) = &session.notes {
                    let _ = writeln!(out, "         {}", notes);
                }
            }
        }
        out
    }
}
