//! Veiculo (vehicle) domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::cliente::{Cliente, ClienteResponse};
use super::entity::{DomainEntity, EntityBase};
use super::validation::{apply_text, apply_value, PLACA_REGEX};
use crate::config::MIN_ANO_VEICULO;

/// Related data loadable with a Veiculo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VeiculoInclude {
    Cliente,
}

/// Veiculo domain entity, owned by one Cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Veiculo {
    #[serde(flatten)]
    pub base: EntityBase,
    pub cliente_id: Uuid,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub cor: String,
    pub ano: i32,
    pub anotacoes: Option<String>,
    /// Owner, loaded only with [`VeiculoInclude::Cliente`]
    #[serde(default)]
    pub cliente: Option<Cliente>,
}

impl DomainEntity for Veiculo {
    type Include = VeiculoInclude;
    const NAME: &'static str = "Veiculo";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl Veiculo {
    pub fn new(dados: CadastrarVeiculo) -> Self {
        Self {
            base: EntityBase::new(),
            cliente_id: dados.cliente_id,
            placa: normalizar_placa(&dados.placa),
            marca: dados.marca,
            modelo: dados.modelo,
            cor: dados.cor,
            ano: dados.ano,
            anotacoes: dados.anotacoes,
            cliente: None,
        }
    }

    pub fn atualizar(&mut self, dados: &AtualizarVeiculo) {
        let mut changed = apply_text(&mut self.marca, dados.marca.as_deref());
        changed |= apply_text(&mut self.modelo, dados.modelo.as_deref());
        changed |= apply_text(&mut self.cor, dados.cor.as_deref());
        changed |= apply_value(&mut self.ano, dados.ano.as_ref());

        if let Some(anotacoes) = dados.anotacoes.as_deref().map(str::trim) {
            if !anotacoes.is_empty() && self.anotacoes.as_deref() != Some(anotacoes) {
                self.anotacoes = Some(anotacoes.to_string());
                changed = true;
            }
        }

        if changed {
            self.base.touch();
        }
    }
}

/// Plates are stored uppercase without separators
pub fn normalizar_placa(placa: &str) -> String {
    placa
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Veiculo creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarVeiculo {
    pub cliente_id: Uuid,
    #[validate(regex(path = *PLACA_REGEX, message = "Invalid placa"))]
    pub placa: String,
    #[validate(length(min = 1, max = 60, message = "Marca is required"))]
    pub marca: String,
    #[validate(length(min = 1, max = 60, message = "Modelo is required"))]
    pub modelo: String,
    #[validate(length(min = 1, max = 30, message = "Cor is required"))]
    pub cor: String,
    #[validate(range(min = MIN_ANO_VEICULO, max = 2100, message = "Invalid ano"))]
    pub ano: i32,
    pub anotacoes: Option<String>,
}

/// Veiculo update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarVeiculo {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub cor: Option<String>,
    #[validate(range(min = MIN_ANO_VEICULO, max = 2100, message = "Invalid ano"))]
    pub ano: Option<i32>,
    pub anotacoes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VeiculoResponse {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub cor: String,
    pub ano: i32,
    pub anotacoes: Option<String>,
    pub cliente: Option<ClienteResponse>,
    pub data_cadastro: DateTime<Utc>,
}

impl From<Veiculo> for VeiculoResponse {
    fn from(veiculo: Veiculo) -> Self {
        Self {
            id: veiculo.base.id,
            cliente_id: veiculo.cliente_id,
            placa: veiculo.placa,
            marca: veiculo.marca,
            modelo: veiculo.modelo,
            cor: veiculo.cor,
            ano: veiculo.ano,
            anotacoes: veiculo.anotacoes,
            cliente: veiculo.cliente.map(ClienteResponse::from),
            data_cadastro: veiculo.base.data_cadastro,
        }
    }
}
