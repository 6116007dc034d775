//! AlertaEstoque: record of a critical-stock alert sent for a stock item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{DomainEntity, EntityBase, NoInclude};

/// At most one alert per stock item per calendar day (UTC)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertaEstoque {
    #[serde(flatten)]
    pub base: EntityBase,
    pub estoque_id: Uuid,
}

impl DomainEntity for AlertaEstoque {
    type Include = NoInclude;
    const NAME: &'static str = "AlertaEstoque";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl AlertaEstoque {
    pub fn new(estoque_id: Uuid) -> Self {
        Self {
            base: EntityBase::new(),
            estoque_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertaEstoqueResponse {
    pub id: Uuid,
    pub estoque_id: Uuid,
    pub data_cadastro: DateTime<Utc>,
}

impl From<AlertaEstoque> for AlertaEstoqueResponse {
    fn from(alerta: AlertaEstoque) -> Self {
        Self {
            id: alerta.base.id,
            estoque_id: alerta.estoque_id,
            data_cadastro: alerta.base.data_cadastro,
        }
    }
}
