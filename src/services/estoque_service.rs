//! Estoque (inventory) use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::alerta_estoque_service::{notificar, registrar_alerta};
use super::{paginar, traced};
use crate::domain::{AtualizarEstoque, CadastrarEstoque, DomainEntity, Estoque, EstoqueResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{AlertaNotifier, UnitOfWorkFactory};
use crate::specifications::{estoque as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait EstoqueService: Send + Sync {
    async fn cadastrar(&self, dados: CadastrarEstoque) -> AppResult<EstoqueResponse>;

    async fn atualizar(&self, id: Uuid, dados: AtualizarEstoque) -> AppResult<EstoqueResponse>;

    async fn remover(&self, id: Uuid) -> AppResult<()>;

    async fn obter_por_id(&self, id: Uuid) -> AppResult<EstoqueResponse>;

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<EstoqueResponse>>;

    async fn listar_criticos(&self) -> AppResult<Vec<EstoqueResponse>>;

    /// Add `delta` units (negative takes units out).
    ///
    /// `InvalidInput` when the result would go negative. An item left
    /// critical gets today's alert.
    async fn movimentar(&self, id: Uuid, delta: i32) -> AppResult<EstoqueResponse>;
}

pub struct EstoqueManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
    notifier: Arc<dyn AlertaNotifier>,
}

impl EstoqueManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>, notifier: Arc<dyn AlertaNotifier>) -> Self {
        Self {
            persistence,
            notifier,
        }
    }
}

#[async_trait]
impl EstoqueService for EstoqueManager {
    async fn cadastrar(&self, dados: CadastrarEstoque) -> AppResult<EstoqueResponse> {
        traced("estoque.cadastrar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            if uow
                .estoques()
                .get_one_untracked(&spec::por_insumo(&dados.insumo))
                .await?
                .is_some()
            {
                return Err(AppError::already_registered(format!("Estoque {}", dados.insumo.trim())));
            }

            let estoque = Estoque::new(dados);
            uow.estoques().create(&estoque).await?;
            uow.commit().await?;
            Ok(estoque.into())
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarEstoque) -> AppResult<EstoqueResponse> {
        traced("estoque.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut estoque = uow
                .estoques()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Estoque")?;

            if let Some(insumo) = dados.insumo.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
                let outro = uow.estoques().get_one_untracked(&spec::por_insumo(insumo)).await?;
                if outro.is_some_and(|outro| !outro.same_identity(&estoque)) {
                    return Err(AppError::already_registered(format!("Estoque {}", insumo)));
                }
            }

            estoque.atualizar(&dados);
            uow.estoques().update(&estoque).await?;
            uow.commit().await?;
            Ok(estoque.into())
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("estoque.remover", async move {
            let uow = self.persistence.begin();
            uow.estoques().soft_delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<EstoqueResponse> {
        traced("estoque.obter_por_id", async move {
            let uow = self.persistence.begin();
            let estoque = uow.estoques().get_by_id(id).await?.ok_or_not_found("Estoque")?;
            Ok(estoque.into())
        })
        .await
    }

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<EstoqueResponse>> {
        traced("estoque.listar", async move {
            let uow = self.persistence.begin();
            let pagina = paginar(uow.estoques().as_ref(), Specification::ativos(), params).await?;
            Ok(pagina.map(EstoqueResponse::from))
        })
        .await
    }

    async fn listar_criticos(&self) -> AppResult<Vec<EstoqueResponse>> {
        traced("estoque.listar_criticos", async move {
            let uow = self.persistence.begin();
            let criticos = uow
                .estoques()
                .list_untracked(&spec::critico().and(Specification::ativos()))
                .await?;
            Ok(criticos.into_iter().map(EstoqueResponse::from).collect())
        })
        .await
    }

    async fn movimentar(&self, id: Uuid, delta: i32) -> AppResult<EstoqueResponse> {
        traced("estoque.movimentar", async move {
            let uow = self.persistence.begin();

            let mut estoque = uow
                .estoques()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Estoque")?;

            estoque.movimentar(delta)?;
            uow.estoques().update(&estoque).await?;

            let alerta = if estoque.is_critico() {
                registrar_alerta(uow.as_ref(), &estoque).await?
            } else {
                None
            };
            uow.commit().await?;

            tracing::info!(
                estoque_id = %estoque.base.id,
                delta,
                disponivel = estoque.quantidade_disponivel,
                "Stock moved"
            );

            if alerta.is_some() {
                notificar(uow.as_ref(), self.notifier.as_ref(), std::slice::from_ref(&estoque)).await;
            }
            Ok(estoque.into())
        })
        .await
    }
}
