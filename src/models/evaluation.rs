use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::client::ClientId;

pub type EvaluationId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "evolucao")]
    pub text: String,
}

/// Physiotherapy assessment attached to a client.
///
/// The backend form carries many clinical fields; only the ones this tool
/// displays are typed, the rest round-trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    #[serde(rename = "clienteId", default)]
    pub client_id: Option<ClientId>,
    #[serde(rename = "dataAvaliacao", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "queixaPrincipal", default)]
    pub complaint: Option<String>,
    #[serde(rename = "diagnostico", default)]
    pub diagnosis: Option<String>,
    #[serde(rename = "planoTratamento", default)]
    pub treatment_plan: Option<String>,
    #[serde(rename = "evolucoes", default)]
    pub evolutions: Vec<Evolution>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationDraft {
    #[serde(rename = "clienteId")]
    pub client_id: ClientId,
    #[serde(rename = "dataAvaliacao", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "queixaPrincipal", skip_serializing_if = "Option::is_none")]
    pub complaint: Option<String>,
    #[serde(rename = "diagnostico", skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(rename = "planoTratamento", skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Evaluation {
    pub fn to_draft(&self, client_id: ClientId) -> EvaluationDraft {
        EvaluationDraft {
            client_id: self.client_id.unwrap_or(client_id),
            date: self.date,
            complaint: self.complaint.clone(),
            diagnosis: self.diagnosis.clone(),
            treatment_plan: self.treatment_plan.clone(),
            extra: self.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_into_the_update_draft() {
        let body = json!({
            "id": 2,
            "clienteId": 5,
            "dataAvaliacao": "2026-01-15",
            "queixaPrincipal": "dor lombar",
            "escalaDor": 7,
            "evolucoes": [{ "id": 1, "data": "2026-01-22", "evolucao": "melhora parcial" }]
        });
        let evaluation: Evaluation = serde_json::from_value(body).unwrap();
        assert_eq!(evaluation.evolutions.len(), 1);
        assert_eq!(evaluation.extra.get("escalaDor"), Some(&json!(7)));

        let draft = serde_json::to_value(evaluation.to_draft(5)).unwrap();
        assert_eq!(draft["escalaDor"], json!(7));
        assert_eq!(draft["queixaPrincipal"], json!("dor lombar"));
        assert!(draft.get("diagnostico").is_none());
    }
}
