use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type ClientId = u64;

pub const UNKNOWN_CLIENT: &str = "Cliente Desconhecido";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    #[serde(rename = "dataNascimento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "dataCadastro", default)]
    pub registered_at: Option<NaiveDateTime>,
    #[serde(rename = "sexo", default)]
    pub sex: String,
    #[serde(rename = "profissao", default)]
    pub profession: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "cidade", default)]
    pub city: String,
}

impl Client {
    /// Completed years of age on `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }

    pub fn formatted_phone(&self) -> String {
        let digits = &self.phone;
        if digits.len() == 11 && digits.bytes().all(|b| b.is_ascii_digit()) {
            format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
        } else {
            digits.clone()
        }
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.phone.contains(term.trim())
    }
}

/// Body for client create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientDraft {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "dataNascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "sexo", skip_serializing_if = "String::is_empty")]
    pub sex: String,
    #[serde(rename = "profissao", skip_serializing_if = "String::is_empty")]
    pub profession: String,
    #[serde(rename = "bairro", skip_serializing_if = "String::is_empty")]
    pub neighborhood: String,
    #[serde(rename = "cidade", skip_serializing_if = "String::is_empty")]
    pub city: String,
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            birth_date: client.birth_date,
            sex: client.sex.clone(),
            profession: client.profession.clone(),
            neighborhood: client.neighborhood.clone(),
            city: client.city.clone(),
        }
    }
}

/// Read-only id to name lookup used when rendering sessions.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    names: HashMap<ClientId, String>,
}

impl ClientDirectory {
    pub fn new(clients: &[Client]) -> Self {
        Self {
            names: clients
                .iter()
                .map(|client| (client.id, client.name.clone()))
                .collect(),
        }
    }

    pub fn name_of(&self, id: ClientId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or(UNKNOWN_CLIENT)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(birth: Option<NaiveDate>) -> Client {
        Client {
            id: 1,
            name: "Maria Souza".to_string(),
            email: "Maria@Example.com".to_string(),
            phone: "11987654321".to_string(),
            birth_date: birth,
            registered_at: None,
            sex: "F".to_string(),
            profession: String::new(),
            neighborhood: String::new(),
            city: String::new(),
        }
    }

    #[test]
    fn age_counts_only_completed_years() {
        let c = client(NaiveDate::from_ymd_opt(1990, 10, 17));
        let day_before = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(c.age_on(day_before), Some(35));
        assert_eq!(c.age_on(birthday), Some(36));
        assert_eq!(client(None).age_on(birthday), None);
    }

    #[test]
    fn phone_is_formatted_when_it_has_eleven_digits() {
        assert_eq!(client(None).formatted_phone(), "(11) 98765-4321");
        let mut short = client(None);
        short.phone = "5555".to_string();
        assert_eq!(short.formatted_phone(), "5555");
    }

    #[test]
    fn search_matches_name_email_or_phone() {
        let c = client(None);
        assert!(c.matches_search("maria"));
        assert!(c.matches_search("example.COM"));
        assert!(c.matches_search("98765"));
        assert!(!c.matches_search("joão"));
    }

    #[test]
    fn directory_falls_back_for_unknown_ids() {
        let directory = ClientDirectory::new(&[client(None)]);
        assert_eq!(directory.name_of(1), "Maria Souza");
        assert_eq!(directory.name_of(99), UNKNOWN_CLIENT);
    }

    #[test]
    fn deserializes_backend_shape() {
        let body = r#"{"id":4,"nome":"Ana","telefone":"1133334444","dataNascimento":"2000-01-31","dataCadastro":"2025-05-01T10:30:00"}"#;
        let parsed: Client = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.name, "Ana");
        assert_eq!(parsed.birth_date, NaiveDate::from_ymd_opt(2000, 1, 31));
        assert!(parsed.email.is_empty());
    }
}
