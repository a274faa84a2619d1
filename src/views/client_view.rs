use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::client::Client;
use crate::models::evaluation::Evaluation;
use crate::models::session::Session;

/// Client cards, narrowed by `search` on name, e-mail or phone.
pub fn render_client_list(clients: &[Client], search: Option<&str>, today: NaiveDate) -> String {
    let term = search.unwrap_or("");
    let matching: Vec<&Client> = clients.iter().filter(|c| c.matches_search(term)).collect();
    if matching.is_empty() {
        return "Nenhum cliente encontrado\n".to_string();
    }
    let mut out = String::new();
    for client in &matching {
        let _ = writeln!(out, "#{:<4} {}", client.id, client.name);
        let _ = writeln!(out, "      {}  {}", client.email, client.formatted_phone());
        let age = client
            .age_on(today)
            .map(|years| format!("{years} anos"))
            .unwrap_or_else(|| "idade não informada".to_string());
        let _ = writeln!(out, "      {}  {}", age, client.profession);
    }
    let _ = writeln!(out, "{} cliente(s)", matching.len());
    out
}

pub fn render_client_detail(
    client: &Client,
    sessions: &[Session],
    evaluations: &[Evaluation],
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", client.name, client.id);
    let _ = writeln!(out, "  E-mail:   {}", client.email);
    let _ = writeln!(out, "  Telefone: {}", client.formatted_phone());
    if let Some(age) = client.age_on(today) {
        let _ = writeln!(out, "  Idade:    {age} anos");
    }
    if !client.city.is_empty() {
        let _ = writeln!(out, "  Endereço: {}, {}", client.neighborhood, client.city);
    }
    let registered = client
        .registered_at
        .map(|at| at.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "Data não informada".to_string());
    let _ = writeln!(out, "  Cadastrado em {registered}");

    let _ = writeln!(out, "Sessões ({})", sessions.len());
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start);
    for session in ordered {
        let _ = writeln!(
            out,
            "  #{:<4} {}  {}  [{}]",
            session.id,
            session.start.format("%d/%m/%Y %H:%M"),
            session.name,
            session.status.wire_name()
        );
    }

    let _ = writeln!(out, "Avaliações ({})", evaluations.len());
    for evaluation in evaluations {
        render_evaluation(&mut out, evaluation);
    }
    out
}

pub fn render_evaluation(out: &mut String, evaluation: &Evaluation) {
    let date = evaluation
        .date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "  #{:<4} {}  {}",
        evaluation.id,
        date,
        evaluation.complaint.as_deref().unwrap_or("")
    );
    for evolution in &evaluation.evolutions {
        let _ = writeln!(
            out,
            "         {} {}",
            evolution.date.as_deref().unwrap_or("-"),
            evolution.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: u64, name: &str, phone: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            email: format!("{}@clinic.test", name.to_lowercase()),
            phone: phone.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1),
            registered_at: None,
            sex: String::new(),
            profession: "Professora".to_string(),
            neighborhood: String::new(),
            city: String::new(),
        }
    }

    #[test]
    fn list_filters_and_shows_age() {
        let clients = vec![client(1, "Ana", "11999990000"), client(2, "Bruno", "21988887777")];
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let out = render_client_list(&clients, Some("bru"), today);
        assert!(out.contains("Bruno"));
        assert!(!out.contains("Ana"));
        assert!(out.contains("46 anos"));
        assert!(out.contains("(21) 98888-7777"));
        assert!(render_client_list(&clients, Some("zzz"), today).contains("Nenhum cliente"));
    }
}
