use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::client::ClientId;

pub type SessionId = u64;

pub const DEFAULT_SESSION_NAME: &str = "Sessão de Fisioterapia";

// Wire format used when writing timestamps back to the backend.
const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "AGENDADA")]
    Scheduled,
    #[serde(rename = "CONCLUIDA")]
    Completed,
    #[serde(rename = "CANCELADA")]
    Canceled,
}

impl SessionStatus {
    pub fn wire_name(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "AGENDADA",
            SessionStatus::Completed => "CONCLUIDA",
            SessionStatus::Canceled => "CANCELADA",
        }
    }
}

/// A scheduled appointment, with timestamps as clinic wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub client_id: ClientId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: SessionStatus,
    pub name: String,
    pub notes: Option<String>,
}

impl Session {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn to_draft(&self) -> SessionDraft {
        SessionDraft {
            client_id: self.client_id,
            start: self.start,
            end: self.end,
            status: self.status,
            name: self.name.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("session must end after it starts ({start} >= {end})")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Request body for creating or updating a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDraft {
    #[serde(rename = "clienteId")]
    pub client_id: ClientId,
    #[serde(rename = "dataHoraInicio", serialize_with = "serialize_wire_timestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "dataHoraFim", serialize_with = "serialize_wire_timestamp")]
    pub end: NaiveDateTime,
    pub status: SessionStatus,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "notasSessao")]
    pub notes: String,
}

impl SessionDraft {
    /// A one-hour session from 09:00 on `day`, matching the booking form defaults.
    pub fn new(client_id: ClientId, day: NaiveDate) -> Self {
        Self {
            client_id,
            start: day.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()),
            end: day.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()),
            status: SessionStatus::Scheduled,
            name: DEFAULT_SESSION_NAME.to_string(),
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.end <= self.start {
            return Err(DraftError::EndBeforeStart {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

fn serialize_wire_timestamp<S: serde::Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(WIRE_TIMESTAMP).to_string())
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("session {session} has no client id (tried clienteId, cliente_id, cliente.id)")]
    MissingClientId { session: SessionId },
    #[error("session {session}: field `{field}` is not a client id: {found}")]
    InvalidClientId {
        session: SessionId,
        field: &'static str,
        found: String,
    },
    #[error("session {session}: field `{field}` is not a timestamp: {found}")]
    InvalidTimestamp {
        session: SessionId,
        field: &'static str,
        found: String,
    },
}

/// Session as the backend sends it. Depending on the backend version the
/// owning client is referenced as `clienteId`, `cliente_id` or a nested
/// `cliente` object; the two legacy forms are accepted for compatibility only.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSession {
    pub id: SessionId,
    #[serde(rename = "clienteId", default)]
    pub cliente_id_camel: Option<Value>,
    #[serde(rename = "cliente_id", default)]
    pub cliente_id_snake: Option<Value>,
    #[serde(rename = "cliente", default)]
    pub cliente: Option<Value>,
    #[serde(rename = "dataHoraInicio")]
    pub start: String,
    #[serde(rename = "dataHoraFim")]
    pub end: String,
    pub status: SessionStatus,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "notasSessao", default)]
    pub notes: Option<String>,
}

impl RawSession {
    pub fn normalize(self, tz: &Tz) -> Result<Session, NormalizeError> {
        let client_id = self.client_id()?;
        let start = parse_timestamp(&self.start, tz).ok_or_else(|| {
            NormalizeError::InvalidTimestamp {
                session: self.id,
                field: "dataHoraInicio",
                found: self.start.clone(),
            }
        })?;
        let end = parse_timestamp(&self.end, tz).ok_or_else(|| {
            NormalizeError::InvalidTimestamp {
                session: self.id,
                field: "dataHoraFim",
                found: self.end.clone(),
            }
        })?;
        Ok(Session {
            id: self.id,
            client_id,
            start,
            end,
            status: self.status,
            name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
        })
    }

    // Fallback order: clienteId, cliente_id, cliente.id. Null counts as absent.
    fn client_id(&self) -> Result<ClientId, NormalizeError> {
        if let Some(id) = self.parse_variant("clienteId", self.cliente_id_camel.as_ref())? {
            return Ok(id);
        }
        if let Some(id) = self.parse_variant("cliente_id", self.cliente_id_snake.as_ref())? {
            debug!(session = self.id, "client id read from legacy field cliente_id");
            return Ok(id);
        }
        match &self.cliente {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                if let Some(id) = self.parse_variant("cliente.id", map.get("id"))? {
                    debug!(session = self.id, "client id read from nested cliente.id");
                    return Ok(id);
                }
                return Err(NormalizeError::InvalidClientId {
                    session: self.id,
                    field: "cliente.id",
                    found: "object without id".to_string(),
                });
            }
            Some(other) => {
                return Err(NormalizeError::InvalidClientId {
                    session: self.id,
                    field: "cliente",
                    found: other.to_string(),
                });
            }
        }
        Err(NormalizeError::MissingClientId { session: self.id })
    }

    fn parse_variant(
        &self,
        field: &'static str,
        value: Option<&Value>,
    ) -> Result<Option<ClientId>, NormalizeError> {
        let invalid = |found: &Value| NormalizeError::InvalidClientId {
            session: self.id,
            field,
            found: found.to_string(),
        };
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| invalid(&Value::Number(n.clone()))),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    trimmed
                        .parse::<ClientId>()
                        .map(Some)
                        .map_err(|_| invalid(&Value::String(s.clone())))
                } else {
                    Err(invalid(&Value::String(s.clone())))
                }
            }
            Some(other) => Err(invalid(other)),
        }
    }
}

/// Parses a backend timestamp into clinic wall-clock time.
///
/// Values carrying an offset are converted into `tz`; naive values are taken
/// to already be clinic local time.
pub fn parse_timestamp(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(tz.from_utc_datetime(&with_offset.naive_utc()).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
