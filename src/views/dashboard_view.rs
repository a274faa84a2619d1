use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::locale::Language;
use crate::models::client::ClientDirectory;
use crate::service::dashboard_service::{DashboardStats, greeting, status_label};

pub fn render_dashboard(
    stats: &DashboardStats,
    directory: &ClientDirectory,
    now: NaiveDateTime,
    language: Language,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}!", greeting(now, language));
    let _ = writeln!(out);
    let _ = writeln!(out, "Clientes:          {}", stats.total_clients);
    let _ = writeln!(out, "Sessões hoje:      {}", stats.today.len());
    let _ = writeln!(out, "Próximas sessões:  {}", stats.upcoming_scheduled);
    let _ = writeln!(out, "Sessões no mês:    {}", stats.this_month);
    let _ = writeln!(out);
    let heading = now
        .date()
        .format_localized(language.long_date_format(), language.chrono_locale());
    let _ = writeln!(out, "{} ({})", language.today(), heading);
    if stats.today.is_empty() {
        let _ = writeln!(out, "  {}", language.empty_agenda());
        return out;
    }
    for session in &stats.today {
        let _ = writeln!(
            out,
            "  {}  {}  {}  ({})",
            session.start.format("%H:%M"),
            directory.name_of(session.client_id),
            session.name,
            status_label(session.status, language)
        );
    }
    out
}
