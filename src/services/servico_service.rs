//! Servico (catalog of shop services) use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{paginar, traced};
use crate::domain::{AtualizarServico, CadastrarServico, DomainEntity, Servico, ServicoResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWorkFactory;
use crate::specifications::{servico as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ServicoService: Send + Sync {
    async fn cadastrar(&self, dados: CadastrarServico) -> AppResult<ServicoResponse>;

    async fn atualizar(&self, id: Uuid, dados: AtualizarServico) -> AppResult<ServicoResponse>;

    async fn remover(&self, id: Uuid) -> AppResult<()>;

    async fn obter_por_id(&self, id: Uuid) -> AppResult<ServicoResponse>;

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<ServicoResponse>>;
}

pub struct ServicoManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
}

impl ServicoManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl ServicoService for ServicoManager {
    async fn cadastrar(&self, dados: CadastrarServico) -> AppResult<ServicoResponse> {
        traced("servico.cadastrar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            if uow
                .servicos()
                .get_one_untracked(&spec::por_nome(&dados.nome))
                .await?
                .is_some()
            {
                return Err(AppError::already_registered(format!("Servico {}", dados.nome.trim())));
            }

            let servico = Servico::new(dados);
            uow.servicos().create(&servico).await?;
            uow.commit().await?;
            Ok(servico.into())
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarServico) -> AppResult<ServicoResponse> {
        traced("servico.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut servico = uow
                .servicos()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Servico")?;

            if let Some(nome) = dados.nome.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                let outro = uow.servicos().get_one_untracked(&spec::por_nome(nome)).await?;
                if outro.is_some_and(|outro| !outro.same_identity(&servico)) {
                    return Err(AppError::already_registered(format!("Servico {}", nome)));
                }
            }

            servico.atualizar(&dados);
            uow.servicos().update(&servico).await?;
            uow.commit().await?;
            Ok(servico.into())
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("servico.remover", async move {
            let uow = self.persistence.begin();
            uow.servicos().soft_delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<ServicoResponse> {
        traced("servico.obter_por_id", async move {
            let uow = self.persistence.begin();
            let servico = uow.servicos().get_by_id(id).await?.ok_or_not_found("Servico")?;
            Ok(servico.into())
        })
        .await
    }

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<ServicoResponse>> {
        traced("servico.listar", async move {
            let uow = self.persistence.begin();
            let pagina = paginar(uow.servicos().as_ref(), Specification::ativos(), params).await?;
            Ok(pagina.map(ServicoResponse::from))
        })
        .await
    }
}
