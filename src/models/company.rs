// src/models/company.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Perfil da empresa emissora. Tratado como singleton ("find first"):
// existe um único perfil por instalação, e as faturas guardam uma
// CÓPIA dele no momento da criação (snapshot, nunca re-sincronizado).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "Panadería La Espiga")]
    pub name: String,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,

    // Configuração de gorjeta aplicada no cálculo de totais.
    // Percentual sempre dentro de [0, 100].
    #[schema(example = "10")]
    pub tip_percentage: Decimal,

    #[schema(example = true)]
    pub tip_enabled: bool,
}

// Dados para criação do perfil.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,
    pub tip_percentage: Option<Decimal>,
    pub tip_enabled: Option<bool>,
}

// Atualização parcial: só os campos presentes são aplicados.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,
    pub tip_percentage: Option<Decimal>,
    pub tip_enabled: Option<bool>,
}

impl Company {
    pub fn new(data: NewCompany) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: data.name,
            address: data.address,
            phone: data.phone,
            email: data.email,
            website: data.website,
            tax_id: data.tax_id,
            logo: data.logo,
            tip_percentage: clamp_percentage(
                data.tip_percentage.unwrap_or_else(|| Decimal::new(10, 0)),
            ),
            tip_enabled: data.tip_enabled.unwrap_or(true),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn update_tip_settings(&mut self, percentage: Decimal, enabled: bool) {
        self.tip_percentage = clamp_percentage(percentage);
        self.tip_enabled = enabled;
        self.updated_at = Utc::now();
    }

    pub fn apply(&mut self, updates: CompanyUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(address) = updates.address {
            self.address = Some(address);
        }
        if let Some(phone) = updates.phone {
            self.phone = Some(phone);
        }
        if let Some(email) = updates.email {
            self.email = Some(email);
        }
        if let Some(website) = updates.website {
            self.website = Some(website);
        }
        if let Some(tax_id) = updates.tax_id {
            self.tax_id = Some(tax_id);
        }
        if let Some(logo) = updates.logo {
            self.logo = Some(logo);
        }
        if let Some(pct) = updates.tip_percentage {
            self.tip_percentage = clamp_percentage(pct);
        }
        if let Some(enabled) = updates.tip_enabled {
            self.tip_enabled = enabled;
        }
        self.updated_at = Utc::now();
    }
}

fn clamp_percentage(pct: Decimal) -> Decimal {
    pct.max(Decimal::ZERO).min(Decimal::new(100, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn nova(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            address: None,
            phone: None,
            email: None,
            website: None,
            tax_id: None,
            logo: None,
            tip_percentage: None,
            tip_enabled: None,
        }
    }

    #[test]
    fn padrao_de_gorjeta_e_10_por_cento_habilitada() {
        let company = Company::new(nova("La Espiga"));
        assert_eq!(company.tip_percentage, Decimal::new(10, 0));
        assert!(company.tip_enabled);
    }

    #[test]
    fn percentual_e_grampeado_entre_0_e_100() {
        let mut company = Company::new(nova("La Espiga"));

        company.update_tip_settings(Decimal::new(150, 0), true);
        assert_eq!(company.tip_percentage, Decimal::new(100, 0));

        company.update_tip_settings(Decimal::new(-5, 0), true);
        assert_eq!(company.tip_percentage, Decimal::ZERO);
    }

    #[test]
    fn aplicar_atualizacao_parcial_preserva_o_resto() {
        let mut company = Company::new(nova("La Espiga"));
        company.apply(CompanyUpdate {
            phone: Some("3001234567".into()),
            ..CompanyUpdate::default()
        });
        assert_eq!(company.name, "La Espiga");
        assert_eq!(company.phone.as_deref(), Some("3001234567"));
    }
}
