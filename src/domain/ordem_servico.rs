//! Ordem de servico (service order) aggregate: status workflow, budget and
//! line items.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::cliente::{Cliente, ClienteResponse};
use super::entity::{DomainEntity, EntityBase};
use super::estoque::{Estoque, EstoqueResponse};
use super::servico::{Servico, ServicoResponse};
use super::veiculo::{Veiculo, VeiculoResponse};
use crate::errors::{AppError, AppResult};

/// Service order workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusOrdemServico {
    Recebida,
    EmDiagnostico,
    AguardandoAprovacao,
    EmExecucao,
    Finalizada,
    Entregue,
    Cancelada,
    OrcamentoExpirado,
}

impl StatusOrdemServico {
    pub const TODOS: [StatusOrdemServico; 8] = [
        StatusOrdemServico::Recebida,
        StatusOrdemServico::EmDiagnostico,
        StatusOrdemServico::AguardandoAprovacao,
        StatusOrdemServico::EmExecucao,
        StatusOrdemServico::Finalizada,
        StatusOrdemServico::Entregue,
        StatusOrdemServico::Cancelada,
        StatusOrdemServico::OrcamentoExpirado,
    ];

    /// Statuses whose pending budget can still expire
    pub const EXPIRAVEIS: [StatusOrdemServico; 3] = [
        StatusOrdemServico::Recebida,
        StatusOrdemServico::EmDiagnostico,
        StatusOrdemServico::AguardandoAprovacao,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusOrdemServico::Recebida => "recebida",
            StatusOrdemServico::EmDiagnostico => "em_diagnostico",
            StatusOrdemServico::AguardandoAprovacao => "aguardando_aprovacao",
            StatusOrdemServico::EmExecucao => "em_execucao",
            StatusOrdemServico::Finalizada => "finalizada",
            StatusOrdemServico::Entregue => "entregue",
            StatusOrdemServico::Cancelada => "cancelada",
            StatusOrdemServico::OrcamentoExpirado => "orcamento_expirado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StatusOrdemServico::Entregue
                | StatusOrdemServico::Cancelada
                | StatusOrdemServico::OrcamentoExpirado
        )
    }

    pub fn pode_transicionar_para(&self, destino: StatusOrdemServico) -> bool {
        use StatusOrdemServico::*;

        match (self, destino) {
            (Recebida, EmDiagnostico) => true,
            (Recebida | EmDiagnostico, AguardandoAprovacao) => true,
            (AguardandoAprovacao, EmExecucao) => true,
            (EmExecucao, Finalizada) => true,
            (Finalizada, Entregue) => true,
            (Recebida | EmDiagnostico | AguardandoAprovacao | EmExecucao, Cancelada) => true,
            (origem, OrcamentoExpirado) => Self::EXPIRAVEIS.contains(origem),
            _ => false,
        }
    }
}

impl std::str::FromStr for StatusOrdemServico {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TODOS
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::invalid(format!("Unknown status '{}'", s)))
    }
}

impl std::fmt::Display for StatusOrdemServico {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Related data loadable with an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdemServicoInclude {
    Cliente,
    Veiculo,
    Servico,
    /// Line items together with their stock item
    Insumos,
}

impl OrdemServicoInclude {
    pub const TODOS: [OrdemServicoInclude; 4] = [
        OrdemServicoInclude::Cliente,
        OrdemServicoInclude::Veiculo,
        OrdemServicoInclude::Servico,
        OrdemServicoInclude::Insumos,
    ];
}

/// Service order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdemServico {
    #[serde(flatten)]
    pub base: EntityBase,
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,
    pub servico_id: Uuid,
    pub descricao: Option<String>,
    pub status: StatusOrdemServico,
    pub orcamento: Option<Decimal>,
    pub data_envio_orcamento: Option<DateTime<Utc>>,
    pub data_finalizacao: Option<DateTime<Utc>>,
    pub data_entrega: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cliente: Option<Cliente>,
    #[serde(default)]
    pub veiculo: Option<Veiculo>,
    #[serde(default)]
    pub servico: Option<Servico>,
    #[serde(default)]
    pub insumos: Vec<InsumoOs>,
}

impl DomainEntity for OrdemServico {
    type Include = OrdemServicoInclude;
    const NAME: &'static str = "OrdemServico";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl OrdemServico {
    pub fn new(dados: CadastrarOrdemServico) -> Self {
        Self {
            base: EntityBase::new(),
            cliente_id: dados.cliente_id,
            veiculo_id: dados.veiculo_id,
            servico_id: dados.servico_id,
            descricao: dados.descricao,
            status: StatusOrdemServico::Recebida,
            orcamento: None,
            data_envio_orcamento: None,
            data_finalizacao: None,
            data_entrega: None,
            cliente: None,
            veiculo: None,
            servico: None,
            insumos: Vec::new(),
        }
    }

    pub fn atualizar(&mut self, dados: &AtualizarOrdemServico) {
        if let Some(descricao) = dados.descricao.as_deref().map(str::trim) {
            if !descricao.is_empty() && self.descricao.as_deref() != Some(descricao) {
                self.descricao = Some(descricao.to_string());
                self.base.touch();
            }
        }
    }

    fn transicionar(&mut self, destino: StatusOrdemServico) -> AppResult<()> {
        if !self.status.pode_transicionar_para(destino) {
            return Err(AppError::invalid(format!(
                "Cannot move order from {} to {}",
                self.status, destino
            )));
        }
        self.status = destino;
        self.base.touch();
        Ok(())
    }

    /// Line items can only be added before the budget is sent
    pub fn aceita_insumos(&self) -> bool {
        matches!(
            self.status,
            StatusOrdemServico::Recebida | StatusOrdemServico::EmDiagnostico
        )
    }

    /// Reserved line items are still out of stock and not yet consumed
    pub fn mantem_reserva(&self) -> bool {
        !self.status.is_terminal() && self.status != StatusOrdemServico::Finalizada
    }

    pub fn iniciar_diagnostico(&mut self) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::EmDiagnostico)
    }

    pub fn enviar_orcamento(&mut self, valor: Decimal, agora: DateTime<Utc>) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::AguardandoAprovacao)?;
        self.orcamento = Some(valor);
        self.data_envio_orcamento = Some(agora);
        Ok(())
    }

    pub fn aprovar_orcamento(&mut self) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::EmExecucao)
    }

    pub fn recusar_orcamento(&mut self) -> AppResult<()> {
        if self.status != StatusOrdemServico::AguardandoAprovacao {
            return Err(AppError::invalid(format!(
                "Cannot refuse a budget while order is {}",
                self.status
            )));
        }
        self.transicionar(StatusOrdemServico::Cancelada)
    }

    pub fn finalizar_execucao(&mut self, agora: DateTime<Utc>) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::Finalizada)?;
        self.data_finalizacao = Some(agora);
        Ok(())
    }

    pub fn entregar(&mut self, agora: DateTime<Utc>) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::Entregue)?;
        self.data_entrega = Some(agora);
        Ok(())
    }

    pub fn cancelar(&mut self) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::Cancelada)
    }

    pub fn expirar_orcamento(&mut self) -> AppResult<()> {
        self.transicionar(StatusOrdemServico::OrcamentoExpirado)
    }

    /// Budget sent at or before `agora - validade` and still pending
    pub fn orcamento_expirado(&self, agora: DateTime<Utc>, validade: Duration) -> bool {
        StatusOrdemServico::EXPIRAVEIS.contains(&self.status)
            && self
                .data_envio_orcamento
                .is_some_and(|enviado| enviado <= agora - validade)
    }

    /// Service price plus the price of every line item.
    ///
    /// Needs the `Servico` and `Insumos` includes loaded.
    pub fn calcular_orcamento(&self) -> AppResult<Decimal> {
        let servico = self
            .servico
            .as_ref()
            .ok_or_else(|| AppError::internal("Order loaded without its servico"))?;

        self.insumos.iter().try_fold(servico.valor, |total, insumo| {
            Ok(total + insumo.valor_total()?)
        })
    }
}

/// Related data loadable with a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsumoOsInclude {
    Estoque,
}

/// Stock item reserved for a service order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsumoOs {
    #[serde(flatten)]
    pub base: EntityBase,
    pub ordem_servico_id: Uuid,
    pub estoque_id: Uuid,
    pub quantidade: i32,
    #[serde(default)]
    pub estoque: Option<Estoque>,
}

impl DomainEntity for InsumoOs {
    type Include = InsumoOsInclude;
    const NAME: &'static str = "InsumoOs";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl InsumoOs {
    pub fn new(ordem_servico_id: Uuid, estoque_id: Uuid, quantidade: i32) -> Self {
        Self {
            base: EntityBase::new(),
            ordem_servico_id,
            estoque_id,
            quantidade,
            estoque: None,
        }
    }

    pub fn valor_total(&self) -> AppResult<Decimal> {
        let estoque = self
            .estoque
            .as_ref()
            .ok_or_else(|| AppError::internal("Line item loaded without its estoque"))?;
        Ok(estoque.preco * Decimal::from(self.quantidade))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarOrdemServico {
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,
    pub servico_id: Uuid,
    #[validate(length(max = 1000, message = "Descricao is too long"))]
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarOrdemServico {
    #[validate(length(max = 1000, message = "Descricao is too long"))]
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdicionarInsumo {
    pub estoque_id: Uuid,
    #[validate(range(min = 1, message = "Quantidade must be at least 1"))]
    pub quantidade: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdicionarInsumos {
    #[validate(length(min = 1, message = "At least one insumo is required"), nested)]
    pub insumos: Vec<AdicionarInsumo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsumoOsResponse {
    pub id: Uuid,
    pub estoque_id: Uuid,
    pub quantidade: i32,
    pub estoque: Option<EstoqueResponse>,
}

impl From<InsumoOs> for InsumoOsResponse {
    fn from(insumo: InsumoOs) -> Self {
        Self {
            id: insumo.base.id,
            estoque_id: insumo.estoque_id,
            quantidade: insumo.quantidade,
            estoque: insumo.estoque.map(EstoqueResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdemServicoResponse {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,
    pub servico_id: Uuid,
    pub descricao: Option<String>,
    pub status: StatusOrdemServico,
    pub orcamento: Option<Decimal>,
    pub data_envio_orcamento: Option<DateTime<Utc>>,
    pub data_finalizacao: Option<DateTime<Utc>>,
    pub data_entrega: Option<DateTime<Utc>>,
    pub cliente: Option<ClienteResponse>,
    pub veiculo: Option<VeiculoResponse>,
    pub servico: Option<ServicoResponse>,
    pub insumos: Vec<InsumoOsResponse>,
    pub data_cadastro: DateTime<Utc>,
}

impl From<OrdemServico> for OrdemServicoResponse {
    fn from(ordem: OrdemServico) -> Self {
        Self {
            id: ordem.base.id,
            cliente_id: ordem.cliente_id,
            veiculo_id: ordem.veiculo_id,
            servico_id: ordem.servico_id,
            descricao: ordem.descricao,
            status: ordem.status,
            orcamento: ordem.orcamento,
            data_envio_orcamento: ordem.data_envio_orcamento,
            data_finalizacao: ordem.data_finalizacao,
            data_entrega: ordem.data_entrega,
            cliente: ordem.cliente.map(ClienteResponse::from),
            veiculo: ordem.veiculo.map(VeiculoResponse::from),
            servico: ordem.servico.map(ServicoResponse::from),
            insumos: ordem.insumos.into_iter().map(InsumoOsResponse::from).collect(),
            data_cadastro: ordem.base.data_cadastro,
        }
    }
}
