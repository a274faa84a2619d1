use std::str::FromStr;

use chrono::Locale;

/// Display language for labels and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Portuguese,
    English,
}

impl Language {
    pub fn chrono_locale(&self) -> Locale {
        match self {
            Language::Portuguese => Locale::pt_BR,
            Language::English => Locale::en_US,
        }
    }

    pub fn long_date_format(&self) -> &'static str {
        match self {
            Language::Portuguese => "%A, %d de %B",
            Language::English => "%A, %B %d",
        }
    }

    pub fn today(&self) -> &'static str {
        match self {
            Language::Portuguese => "Hoje",
            Language::English => "Today",
        }
    }

    pub fn tomorrow(&self) -> &'static str {
        match self {
            Language::Portuguese => "Amanhã",
            Language::English => "Tomorrow",
        }
    }

    pub fn loading(&self) -> &'static str {
        match self {
            Language::Portuguese => "Carregando agendamentos...",
            Language::English => "Loading appointments...",
        }
    }

    pub fn empty_agenda(&self) -> &'static str {
        match self {
            Language::Portuguese => "Nenhum agendamento neste período",
            Language::English => "No appointments in this period",
        }
    }

    pub fn empty_agenda_hint(&self) -> &'static str {
        match self {
            Language::Portuguese => "Tente alterar o filtro ou adicione um novo agendamento.",
            Language::English => "Try another filter or add a new appointment.",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" => Ok(Language::Portuguese),
            "en" | "en-us" | "en_us" => Ok(Language::English),
            other => Err(format!("unsupported language {other}")),
        }
    }
}
