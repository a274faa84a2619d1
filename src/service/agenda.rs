use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::locale::Language;
use crate::models::session::Session;

/// Time window applied to the agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    All,
    Today,
    #[default]
    ThisWeek,
    ThisMonth,
}

impl FilterMode {
    pub fn keeps(&self, start: NaiveDateTime, now: NaiveDateTime) -> bool {
        let date = start.date();
        let today = now.date();
        match self {
            FilterMode::All => true,
            FilterMode::Today => date == today,
            FilterMode::ThisWeek => {
                let offset = u64::from(today.weekday().num_days_from_sunday());
                let week_start = today.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
                (0..7).contains(&date.signed_duration_since(week_start).num_days())
            }
            FilterMode::ThisMonth => date.year() == today.year() && date.month() == today.month(),
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "today" => Ok(FilterMode::Today),
            "week" => Ok(FilterMode::ThisWeek),
            "month" => Ok(FilterMode::ThisMonth),
            other => Err(format!("unknown filter {other} (expected all, today, week or month)")),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterMode::All => "all",
            FilterMode::Today => "today",
            FilterMode::ThisWeek => "week",
            FilterMode::ThisMonth => "month",
        };
        f.write_str(name)
    }
}

/// Sessions starting on one calendar date, in start order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDay {
    pub label: String,
    pub bucket: DayBucket,
}

/// Keeps the sessions inside the `mode` window around `now`, in input order.
pub fn filter_sessions(sessions: &[Session], mode: FilterMode, now: NaiveDateTime) -> Vec<Session> {
    sessions
        .iter()
        .filter(|session| mode.keeps(session.start, now))
        .cloned()
        .collect()
}

/// Partitions sessions into day buckets ordered by first appearance after a
/// stable sort on start time.
pub fn group_by_day(sessions: &[Session]) -> Vec<DayBucket> {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|session| session.start);

    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    for session in ordered {
        let date = session.start_date();
        let slot = *index.entry(date).or_insert_with(|| {
            buckets.push(DayBucket {
                date,
                sessions: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].sessions.push(session.clone());
    }
    buckets
}

pub fn day_label(date: NaiveDate, today: NaiveDate, language: Language) -> String {
    if date == today {
        return language.today().to_string();
    }
    if today.succ_opt() == Some(date) {
        return language.tomorrow().to_string();
    }
    date.format_localized(language.long_date_format(), language.chrono_locale())
        .to_string()
}

pub fn build_agenda(
    sessions: &[Session],
    mode: FilterMode,
    now: NaiveDateTime,
    language: Language,
) -> Vec<LabeledDay> {
    let today = now.date();
    group_by_day(&filter_sessions(sessions, mode, now))
        .into_iter()
        .map(|bucket| LabeledDay {
            label: day_label(bucket.date, today, language),
            bucket,
        })
        .collect()
}
