use chrono::{NaiveDateTime, Timelike};

use crate::locale::Language;
use crate::models::client::Client;
use crate::models::session::{Session, SessionStatus};
use crate::service::agenda::FilterMode;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub today: Vec<Session>,
    pub upcoming_scheduled: usize,
    pub this_month: usize,
}

impl DashboardStats {
    pub fn compute(sessions: &[Session], clients: &[Client], now: NaiveDateTime) -> Self {
        let mut today: Vec<Session> = sessions
            .iter()
            .filter(|s| FilterMode::Today.keeps(s.start, now))
            .cloned()
            .collect();
        today.sort_by_key(|s| s.start);

        let upcoming_scheduled = sessions
            .iter()
            .filter(|s| s.start >= now && s.status == SessionStatus::Scheduled)
            .count();
        let this_month = sessions
            .iter()
            .filter(|s| FilterMode::ThisMonth.keeps(s.start, now))
            .count();

        Self {
            total_clients: clients.len(),
            today,
            upcoming_scheduled,
            this_month,
        }
    }
}

pub fn greeting(now: NaiveDateTime, language: Language) -> &'static str {
    let hour = now.hour();
    match (language, hour) {
        (Language::Portuguese, 0..=11) => "Bom dia",
        (Language::Portuguese, 12..=17) => "Boa tarde",
        (Language::Portuguese, _) => "Boa noite",
        (Language::English, 0..=11) => "Good morning",
        (Language::English, 12..=17) => "Good afternoon",
        (Language::English, _) => "Good evening",
    }
}

pub fn status_label(status: SessionStatus, language: Language) -> &'static str {
    match (language, status) {
        (Language::Portuguese, SessionStatus::Scheduled) => "Agendada",
        (Language::Portuguese, SessionStatus::Completed) => "Concluída",
        (Language::Portuguese, SessionStatus::Canceled) => "Cancelada",
        (Language::English, SessionStatus::Scheduled) => "Scheduled",
        (Language::English, SessionStatus::Completed) => "Completed",
        (Language::English, SessionStatus::Canceled) => "Canceled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    fn session(id: u64, start: NaiveDateTime, status: SessionStatus) -> Session {
        Session {
            id,
            client_id: 1,
            start,
            end: start + chrono::Duration::minutes(50),
            status,
            name: "Sessão".to_string(),
            notes: None,
        }
    }

    #[test]
    fn stats_count_today_upcoming_and_month() {
        let sessions = vec![
            session(1, at(16, 15), SessionStatus::Scheduled),
            session(2, at(16, 8), SessionStatus::Completed),
            session(3, at(20, 9), SessionStatus::Scheduled),
            session(4, at(21, 9), SessionStatus::Canceled),
            session(5, at(1, 9), SessionStatus::Completed),
        ];
        let stats = DashboardStats::compute(&sessions, &[], at(16, 12));
        assert_eq!(stats.total_clients, 0);
        assert_eq!(stats.today.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(stats.upcoming_scheduled, 2);
        assert_eq!(stats.this_month, 5);
    }

    #[test]
    fn month_count_matches_the_agenda_month_filter() {
        let last_year = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let next_month = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let sessions = vec![
            session(1, at(31, 23), SessionStatus::Scheduled),
            session(2, last_year, SessionStatus::Completed),
            session(3, next_month, SessionStatus::Scheduled),
        ];
        let now = at(16, 12);
        let stats = DashboardStats::compute(&sessions, &[], now);
        let filtered = crate::service::agenda::filter_sessions(&sessions, FilterMode::ThisMonth, now);
        assert_eq!(stats.this_month, 1);
        assert_eq!(stats.this_month, filtered.len());
    }

    #[test]
    fn greeting_follows_the_clock() {
        assert_eq!(greeting(at(16, 11), Language::Portuguese), "Bom dia");
        assert_eq!(greeting(at(16, 12), Language::Portuguese), "Boa tarde");
        assert_eq!(greeting(at(16, 18), Language::English), "Good evening");
    }
}
