// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Tipos de identificação aceitos na Colômbia (+ fallback genérico)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdentificationType {
    Cedula,
    Nit,
    Passport,
    Other,
}

// Cliente opcional de uma fatura. Todos os campos são opcionais:
// uma fatura pode existir sem cliente.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "María")]
    pub first_name: Option<String>,

    #[schema(example = "González")]
    pub last_name: Option<String>,

    #[schema(example = "maria@example.com")]
    pub email: Option<String>,

    pub identification_type: Option<IdentificationType>,

    #[schema(example = "1020304050")]
    pub identification_number: Option<String>,
}

// Dados de cliente como chegam no payload (sem id/timestamps).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub identification_type: Option<IdentificationType>,
    pub identification_number: Option<String>,
}

impl Client {
    pub fn new(data: ClientDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            identification_type: data.identification_type,
            identification_number: data.identification_number,
        }
    }

    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (None, None) => String::new(),
            (first, last) => format!(
                "{} {}",
                first.as_deref().unwrap_or(""),
                last.as_deref().unwrap_or("")
            )
            .trim()
            .to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.identification_number.is_some()
    }
}

impl From<ClientDraft> for Client {
    fn from(data: ClientDraft) -> Self {
        Client::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ClientDraft {
        ClientDraft {
            first_name: None,
            last_name: None,
            email: None,
            identification_type: None,
            identification_number: None,
        }
    }

    #[test]
    fn nome_completo_concatena_e_apara() {
        let client = Client::new(ClientDraft {
            first_name: Some("María".into()),
            ..draft()
        });
        assert_eq!(client.full_name(), "María");

        let completo = Client::new(ClientDraft {
            first_name: Some("María".into()),
            last_name: Some("González".into()),
            ..draft()
        });
        assert_eq!(completo.full_name(), "María González");

        assert_eq!(Client::new(draft()).full_name(), "");
    }

    #[test]
    fn completo_exige_algum_identificador() {
        assert!(!Client::new(draft()).is_complete());
        assert!(Client::new(ClientDraft {
            identification_number: Some("123".into()),
            ..draft()
        })
        .is_complete());
    }
}
