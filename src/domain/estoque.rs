//! Estoque (stock item) domain entity and related types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{DomainEntity, EntityBase, NoInclude};
use super::servico::validar_valor;
use super::validation::{apply_text, apply_value};
use crate::errors::{AppError, AppResult};

/// Stock item consumed by service orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estoque {
    #[serde(flatten)]
    pub base: EntityBase,
    pub insumo: String,
    pub descricao: String,
    pub preco: Decimal,
    pub quantidade_disponivel: i32,
    pub quantidade_minima: i32,
}

impl DomainEntity for Estoque {
    type Include = NoInclude;
    const NAME: &'static str = "Estoque";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl Estoque {
    pub fn new(dados: CadastrarEstoque) -> Self {
        Self {
            base: EntityBase::new(),
            insumo: dados.insumo.trim().to_string(),
            descricao: dados.descricao,
            preco: dados.preco,
            quantidade_disponivel: dados.quantidade_disponivel,
            quantidade_minima: dados.quantidade_minima,
        }
    }

    /// Critical when available ≤ minimum
    pub fn is_critico(&self) -> bool {
        self.quantidade_disponivel <= self.quantidade_minima
    }

    pub fn atualizar(&mut self, dados: &AtualizarEstoque) {
        let mut changed = apply_text(&mut self.insumo, dados.insumo.as_deref());
        changed |= apply_text(&mut self.descricao, dados.descricao.as_deref());
        changed |= apply_value(&mut self.preco, dados.preco.as_ref());
        changed |= apply_value(
            &mut self.quantidade_disponivel,
            dados.quantidade_disponivel.as_ref(),
        );
        changed |= apply_value(&mut self.quantidade_minima, dados.quantidade_minima.as_ref());
        if changed {
            self.base.touch();
        }
    }

    /// Apply a signed quantity delta. The result must not go negative.
    pub fn movimentar(&mut self, delta: i32) -> AppResult<()> {
        let nova = self
            .quantidade_disponivel
            .checked_add(delta)
            .filter(|q| *q >= 0)
            .ok_or_else(|| {
                AppError::invalid(format!(
                    "Insufficient stock for '{}': {} available, {} requested",
                    self.insumo, self.quantidade_disponivel, -delta
                ))
            })?;
        self.quantidade_disponivel = nova;
        self.base.touch();
        Ok(())
    }

    /// Take `quantidade` units out for a service order
    pub fn reservar(&mut self, quantidade: i32) -> AppResult<()> {
        self.movimentar(-quantidade)
    }

    /// Put `quantidade` units back
    pub fn repor(&mut self, quantidade: i32) -> AppResult<()> {
        self.movimentar(quantidade)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarEstoque {
    #[validate(length(min = 1, max = 120, message = "Insumo is required"))]
    pub insumo: String,
    #[validate(length(max = 500, message = "Descricao is too long"))]
    pub descricao: String,
    #[validate(custom(function = "validar_valor"))]
    pub preco: Decimal,
    #[validate(range(min = 0, message = "Quantidade disponivel must not be negative"))]
    pub quantidade_disponivel: i32,
    #[validate(range(min = 0, message = "Quantidade minima must not be negative"))]
    pub quantidade_minima: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarEstoque {
    pub insumo: Option<String>,
    pub descricao: Option<String>,
    #[validate(custom(function = "validar_valor"))]
    pub preco: Option<Decimal>,
    #[validate(range(min = 0, message = "Quantidade disponivel must not be negative"))]
    pub quantidade_disponivel: Option<i32>,
    #[validate(range(min = 0, message = "Quantidade minima must not be negative"))]
    pub quantidade_minima: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstoqueResponse {
    pub id: Uuid,
    pub insumo: String,
    pub descricao: String,
    pub preco: Decimal,
    pub quantidade_disponivel: i32,
    pub quantidade_minima: i32,
    pub critico: bool,
    pub data_cadastro: DateTime<Utc>,
}

impl From<Estoque> for EstoqueResponse {
    fn from(estoque: Estoque) -> Self {
        let critico = estoque.is_critico();
        Self {
            id: estoque.base.id,
            insumo: estoque.insumo,
            descricao: estoque.descricao,
            preco: estoque.preco,
            quantidade_disponivel: estoque.quantidade_disponivel,
            quantidade_minima: estoque.quantidade_minima,
            critico,
            data_cadastro: estoque.base.data_cadastro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estoque(disponivel: i32, minima: i32) -> Estoque {
        Estoque::new(CadastrarEstoque {
            insumo: "Filtro de oleo".to_string(),
            descricao: String::new(),
            preco: Decimal::new(3500, 2),
            quantidade_disponivel: disponivel,
            quantidade_minima: minima,
        })
    }

    #[test]
    fn test_critico_boundary() {
        assert!(estoque(5, 5).is_critico());
        assert!(estoque(4, 5).is_critico());
        assert!(!estoque(6, 5).is_critico());
    }

    #[test]
    fn test_movimentar_never_goes_negative() {
        let mut item = estoque(3, 1);
        assert!(item.reservar(4).is_err());
        assert_eq!(item.quantidade_disponivel, 3);

        item.reservar(3).unwrap();
        assert_eq!(item.quantidade_disponivel, 0);

        item.repor(2).unwrap();
        assert_eq!(item.quantidade_disponivel, 2);
    }
}
