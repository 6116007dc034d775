//! Ordem de servico workflow: registration, line items, budget and status
//! transitions.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::alerta_estoque_service::{notificar, registrar_alerta};
use super::{paginar, traced};
use crate::domain::{
    AdicionarInsumos, AtualizarOrdemServico, CadastrarOrdemServico, DomainEntity, Estoque,
    InsumoOs, OrdemServico, OrdemServicoInclude, OrdemServicoResponse, StatusOrdemServico,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{AlertaNotifier, UnitOfWork, UnitOfWorkFactory};
use crate::specifications::{estoque, ordem_servico as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait OrdemServicoService: Send + Sync {
    /// Open an order. Cliente, veiculo and servico must exist and the
    /// veiculo must belong to the cliente.
    async fn cadastrar(&self, dados: CadastrarOrdemServico) -> AppResult<OrdemServicoResponse>;

    async fn atualizar(&self, id: Uuid, dados: AtualizarOrdemServico) -> AppResult<OrdemServicoResponse>;

    /// Delete the order and its line items, returning reserved stock
    async fn remover(&self, id: Uuid) -> AppResult<()>;

    /// Order with cliente, veiculo, servico and line items
    async fn obter_por_id(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    async fn listar(
        &self,
        status: Option<StatusOrdemServico>,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrdemServicoResponse>>;

    /// Reserve stock for new line items
    async fn adicionar_insumos(&self, id: Uuid, dados: AdicionarInsumos) -> AppResult<OrdemServicoResponse>;

    async fn iniciar_diagnostico(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    /// Price the order (servico plus line items) and send it for approval
    async fn enviar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    async fn aprovar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    /// Cancel the order and return its stock
    async fn recusar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    async fn finalizar_execucao(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    async fn entregar(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;

    /// Cancel the order and return its stock
    async fn cancelar(&self, id: Uuid) -> AppResult<OrdemServicoResponse>;
}

/// Put the quantities of `insumos` back into stock, one tracked read for all
/// stock items. Returns the number of stock items touched. Caller commits.
pub(crate) async fn devolver_insumos<'a>(
    uow: &dyn UnitOfWork,
    insumos: impl IntoIterator<Item = &'a InsumoOs>,
) -> AppResult<usize> {
    let mut quantidades: BTreeMap<Uuid, i32> = BTreeMap::new();
    for insumo in insumos {
        *quantidades.entry(insumo.estoque_id).or_default() += insumo.quantidade;
    }
    if quantidades.is_empty() {
        return Ok(0);
    }

    let mut estoques = uow
        .estoques()
        .list(&estoque::por_ids(quantidades.keys().copied().collect()))
        .await?;

    for item in &mut estoques {
        if let Some(quantidade) = quantidades.remove(&item.base.id) {
            item.repor(quantidade)?;
        }
    }
    if let Some(faltante) = quantidades.keys().next() {
        return Err(AppError::not_found(format!("Estoque {}", faltante)));
    }

    uow.estoques().update_many(&estoques).await?;
    Ok(estoques.len())
}

pub struct OrdemServicoManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
    notifier: Arc<dyn AlertaNotifier>,
}

impl OrdemServicoManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>, notifier: Arc<dyn AlertaNotifier>) -> Self {
        Self {
            persistence,
            notifier,
        }
    }

    /// Locked order with the requested includes
    async fn carregar(
        uow: &dyn UnitOfWork,
        id: Uuid,
        includes: &[OrdemServicoInclude],
    ) -> AppResult<OrdemServico> {
        uow.ordens_servico()
            .get_one(&Specification::por_id(id).with_includes(includes.iter().copied()))
            .await?
            .ok_or_not_found("OrdemServico")
    }

    /// Committed state of the order, fully loaded
    async fn detalhar(uow: &dyn UnitOfWork, id: Uuid) -> AppResult<OrdemServicoResponse> {
        let ordem = uow
            .ordens_servico()
            .get_one_untracked(&spec::detalhada(id))
            .await?
            .ok_or_not_found("OrdemServico")?;
        Ok(ordem.into())
    }

    /// [`Self::detalhar`] after a commit. A failure here leaves the change
    /// persisted, so it is logged for the caller to re-read instead of retry.
    async fn recarregar(uow: &dyn UnitOfWork, id: Uuid) -> AppResult<OrdemServicoResponse> {
        Self::detalhar(uow, id).await.inspect_err(|e| {
            tracing::warn!(ordem_id = %id, error = %e, "Order committed but reload failed");
        })
    }

    /// Apply a status transition with no stock effect
    async fn transicionar<F>(&self, id: Uuid, transicao: F) -> AppResult<OrdemServicoResponse>
    where
        F: FnOnce(&mut OrdemServico) -> AppResult<()> + Send,
    {
        let uow = self.persistence.begin();
        let mut ordem = Self::carregar(uow.as_ref(), id, &[]).await?;

        let anterior = ordem.status;
        transicao(&mut ordem)?;
        uow.ordens_servico().update(&ordem).await?;
        uow.commit().await?;

        tracing::info!(ordem_id = %id, de = %anterior, para = %ordem.status, "Order status changed");
        Self::recarregar(uow.as_ref(), id).await
    }

    /// Cancel through `transicao`, returning reserved stock
    async fn encerrar<F>(&self, id: Uuid, transicao: F) -> AppResult<OrdemServicoResponse>
    where
        F: FnOnce(&mut OrdemServico) -> AppResult<()> + Send,
    {
        let uow = self.persistence.begin();
        let mut ordem = Self::carregar(uow.as_ref(), id, &[OrdemServicoInclude::Insumos]).await?;

        let reservado = ordem.mantem_reserva();
        transicao(&mut ordem)?;
        if reservado {
            devolver_insumos(uow.as_ref(), &ordem.insumos).await?;
        }
        uow.ordens_servico().update(&ordem).await?;
        uow.commit().await?;

        tracing::info!(ordem_id = %id, status = %ordem.status, "Order closed");
        Self::recarregar(uow.as_ref(), id).await
    }
}

#[async_trait]
impl OrdemServicoService for OrdemServicoManager {
    async fn cadastrar(&self, dados: CadastrarOrdemServico) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.cadastrar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let cliente = uow
                .clientes()
                .get_one_untracked(&Specification::por_id(dados.cliente_id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Cliente")?;
            let veiculo = uow
                .veiculos()
                .get_one_untracked(&Specification::por_id(dados.veiculo_id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Veiculo")?;
            if veiculo.cliente_id != cliente.base.id {
                return Err(AppError::invalid(format!(
                    "Veiculo {} does not belong to cliente {}",
                    veiculo.placa, cliente.nome
                )));
            }
            uow.servicos()
                .get_one_untracked(&Specification::por_id(dados.servico_id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Servico")?;

            let ordem = OrdemServico::new(dados);
            uow.ordens_servico().create(&ordem).await?;
            uow.commit().await?;

            tracing::info!(ordem_id = %ordem.base.id, placa = %veiculo.placa, "Order opened");
            Self::recarregar(uow.as_ref(), ordem.base.id).await
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarOrdemServico) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut ordem = Self::carregar(uow.as_ref(), id, &[]).await?;
            if ordem.status.is_terminal() {
                return Err(AppError::invalid(format!("Order is {}", ordem.status)));
            }

            ordem.atualizar(&dados);
            uow.ordens_servico().update(&ordem).await?;
            uow.commit().await?;
            Self::recarregar(uow.as_ref(), id).await
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("ordem_servico.remover", async move {
            let uow = self.persistence.begin();
            let ordem = Self::carregar(uow.as_ref(), id, &[OrdemServicoInclude::Insumos]).await?;

            if ordem.mantem_reserva() {
                devolver_insumos(uow.as_ref(), &ordem.insumos).await?;
            }
            let insumos: Vec<Uuid> = ordem.insumos.iter().map(DomainEntity::id).collect();
            uow.insumos_os().delete_many(&insumos).await?;
            uow.ordens_servico().delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.obter_por_id", async move {
            let uow = self.persistence.begin();
            Self::detalhar(uow.as_ref(), id).await
        })
        .await
    }

    async fn listar(
        &self,
        status: Option<StatusOrdemServico>,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrdemServicoResponse>> {
        traced("ordem_servico.listar", async move {
            let uow = self.persistence.begin();
            let filtro = match status {
                Some(status) => spec::por_status(status),
                None => Specification::all(),
            };
            let pagina = paginar(uow.ordens_servico().as_ref(), filtro, params).await?;
            Ok(pagina.map(OrdemServicoResponse::from))
        })
        .await
    }

    async fn adicionar_insumos(&self, id: Uuid, dados: AdicionarInsumos) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.adicionar_insumos", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut ordem = Self::carregar(uow.as_ref(), id, &[]).await?;
            if !ordem.aceita_insumos() {
                return Err(AppError::invalid(format!(
                    "Line items cannot be added while order is {}",
                    ordem.status
                )));
            }

            let mut quantidades: BTreeMap<Uuid, i32> = BTreeMap::new();
            for item in &dados.insumos {
                *quantidades.entry(item.estoque_id).or_default() += item.quantidade;
            }

            let mut estoques: Vec<Estoque> = Vec::with_capacity(quantidades.len());
            let mut insumos: Vec<InsumoOs> = Vec::with_capacity(quantidades.len());
            for (estoque_id, quantidade) in quantidades {
                let mut item = uow
                    .estoques()
                    .get_one(&Specification::por_id(estoque_id).and(Specification::ativos()))
                    .await?
                    .ok_or_not_found("Estoque")?;
                item.reservar(quantidade)?;
                insumos.push(InsumoOs::new(ordem.base.id, estoque_id, quantidade));
                estoques.push(item);
            }

            uow.estoques().update_many(&estoques).await?;
            uow.insumos_os().create_many(&insumos).await?;

            let mut alertados = Vec::new();
            for item in estoques.iter().filter(|e| e.is_critico()) {
                if registrar_alerta(uow.as_ref(), item).await?.is_some() {
                    alertados.push(item.clone());
                }
            }

            ordem.base.touch();
            uow.ordens_servico().update(&ordem).await?;
            uow.commit().await?;

            tracing::info!(ordem_id = %id, itens = insumos.len(), "Stock reserved for order");
            notificar(uow.as_ref(), self.notifier.as_ref(), &alertados).await;
            Self::recarregar(uow.as_ref(), id).await
        })
        .await
    }

    async fn iniciar_diagnostico(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced(
            "ordem_servico.iniciar_diagnostico",
            self.transicionar(id, OrdemServico::iniciar_diagnostico),
        )
        .await
    }

    async fn enviar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.enviar_orcamento", async move {
            let uow = self.persistence.begin();
            let mut ordem = Self::carregar(
                uow.as_ref(),
                id,
                &[OrdemServicoInclude::Servico, OrdemServicoInclude::Insumos],
            )
            .await?;

            let valor = ordem.calcular_orcamento()?;
            ordem.enviar_orcamento(valor, Utc::now())?;
            uow.ordens_servico().update(&ordem).await?;
            uow.commit().await?;

            tracing::info!(ordem_id = %id, orcamento = %valor, "Budget sent");
            Self::recarregar(uow.as_ref(), id).await
        })
        .await
    }

    async fn aprovar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced(
            "ordem_servico.aprovar_orcamento",
            self.transicionar(id, OrdemServico::aprovar_orcamento),
        )
        .await
    }

    async fn recusar_orcamento(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced(
            "ordem_servico.recusar_orcamento",
            self.encerrar(id, OrdemServico::recusar_orcamento),
        )
        .await
    }

    async fn finalizar_execucao(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced(
            "ordem_servico.finalizar_execucao",
            self.transicionar(id, |ordem| ordem.finalizar_execucao(Utc::now())),
        )
        .await
    }

    async fn entregar(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced(
            "ordem_servico.entregar",
            self.transicionar(id, |ordem| ordem.entregar(Utc::now())),
        )
        .await
    }

    async fn cancelar(&self, id: Uuid) -> AppResult<OrdemServicoResponse> {
        traced("ordem_servico.cancelar", self.encerrar(id, OrdemServico::cancelar)).await
    }
}
