//! Cliente use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{paginar, traced};
use crate::domain::{AtualizarCliente, CadastrarCliente, Cliente, ClienteInclude, ClienteResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWorkFactory;
use crate::specifications::{cliente as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ClienteService: Send + Sync {
    /// Register a cliente. The documento must be unused.
    async fn cadastrar(&self, dados: CadastrarCliente) -> AppResult<ClienteResponse>;

    /// Apply only the fields present in `dados`
    async fn atualizar(&self, id: Uuid, dados: AtualizarCliente) -> AppResult<ClienteResponse>;

    /// Soft delete
    async fn remover(&self, id: Uuid) -> AppResult<()>;

    /// Cliente with its veiculos
    async fn obter_por_id(&self, id: Uuid) -> AppResult<ClienteResponse>;

    async fn obter_por_documento(&self, documento: &str) -> AppResult<ClienteResponse>;

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<ClienteResponse>>;

    async fn listar_com_veiculos(&self) -> AppResult<Vec<ClienteResponse>>;
}

pub struct ClienteManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
}

impl ClienteManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl ClienteService for ClienteManager {
    async fn cadastrar(&self, dados: CadastrarCliente) -> AppResult<ClienteResponse> {
        traced("cliente.cadastrar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let existente = uow
                .clientes()
                .get_one_untracked(&spec::por_documento(&dados.documento))
                .await?;
            if existente.is_some() {
                return Err(AppError::already_registered(format!(
                    "Cliente with documento {}",
                    dados.documento
                )));
            }

            let cliente = Cliente::new(dados);
            uow.clientes().create(&cliente).await?;
            uow.commit().await?;

            tracing::info!(cliente_id = %cliente.base.id, "Cliente registered");
            Ok(cliente.into())
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarCliente) -> AppResult<ClienteResponse> {
        traced("cliente.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut cliente = uow
                .clientes()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Cliente")?;

            cliente.atualizar(&dados);
            uow.clientes().update(&cliente).await?;
            uow.commit().await?;
            Ok(cliente.into())
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("cliente.remover", async move {
            let uow = self.persistence.begin();
            uow.clientes().soft_delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<ClienteResponse> {
        traced("cliente.obter_por_id", async move {
            let uow = self.persistence.begin();
            let cliente = uow
                .clientes()
                .get_one_untracked(&Specification::por_id(id).with_include(ClienteInclude::Veiculos))
                .await?
                .ok_or_not_found("Cliente")?;
            Ok(cliente.into())
        })
        .await
    }

    async fn obter_por_documento(&self, documento: &str) -> AppResult<ClienteResponse> {
        traced("cliente.obter_por_documento", async move {
            let uow = self.persistence.begin();
            let cliente = uow
                .clientes()
                .get_one_untracked(&spec::por_documento(documento))
                .await?
                .ok_or_not_found("Cliente")?;
            Ok(cliente.into())
        })
        .await
    }

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<ClienteResponse>> {
        traced("cliente.listar", async move {
            let uow = self.persistence.begin();
            let pagina = paginar(uow.clientes().as_ref(), Specification::ativos(), params).await?;
            Ok(pagina.map(ClienteResponse::from))
        })
        .await
    }

    async fn listar_com_veiculos(&self) -> AppResult<Vec<ClienteResponse>> {
        traced("cliente.listar_com_veiculos", async move {
            let uow = self.persistence.begin();
            let clientes = uow
                .clientes()
                .list_untracked(&spec::com_veiculos().and(Specification::ativos()))
                .await?;
            Ok(clientes.into_iter().map(ClienteResponse::from).collect())
        })
        .await
    }
}
