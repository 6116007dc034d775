//! Servico (catalogue service) domain entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::entity::{DomainEntity, EntityBase, NoInclude};
use super::validation::{apply_text, apply_value};

/// Service offered by the shop with its base price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Servico {
    #[serde(flatten)]
    pub base: EntityBase,
    pub nome: String,
    pub descricao: String,
    pub valor: Decimal,
}

impl DomainEntity for Servico {
    type Include = NoInclude;
    const NAME: &'static str = "Servico";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl Servico {
    pub fn new(dados: CadastrarServico) -> Self {
        Self {
            base: EntityBase::new(),
            nome: dados.nome.trim().to_string(),
            descricao: dados.descricao,
            valor: dados.valor,
        }
    }

    pub fn atualizar(&mut self, dados: &AtualizarServico) {
        let mut changed = apply_text(&mut self.nome, dados.nome.as_deref());
        changed |= apply_text(&mut self.descricao, dados.descricao.as_deref());
        changed |= apply_value(&mut self.valor, dados.valor.as_ref());
        if changed {
            self.base.touch();
        }
    }
}

/// Money amounts must not be negative
pub(crate) fn validar_valor(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("negative_amount");
        err.message = Some("Amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarServico {
    #[validate(length(min = 1, max = 120, message = "Nome is required"))]
    pub nome: String,
    #[validate(length(max = 500, message = "Descricao is too long"))]
    pub descricao: String,
    #[validate(custom(function = "validar_valor"))]
    pub valor: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarServico {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    #[validate(custom(function = "validar_valor"))]
    pub valor: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicoResponse {
    pub id: Uuid,
    pub nome: String,
    pub descricao: String,
    pub valor: Decimal,
    pub data_cadastro: DateTime<Utc>,
}

impl From<Servico> for ServicoResponse {
    fn from(servico: Servico) -> Self {
        Self {
            id: servico.base.id,
            nome: servico.nome,
            descricao: servico.descricao,
            valor: servico.valor,
            data_cadastro: servico.base.data_cadastro,
        }
    }
}
