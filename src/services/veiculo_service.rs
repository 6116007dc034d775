//! Veiculo use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{paginar, traced};
use crate::domain::{
    normalizar_placa, AtualizarVeiculo, CadastrarVeiculo, Veiculo, VeiculoInclude, VeiculoResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWorkFactory;
use crate::specifications::{veiculo as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait VeiculoService: Send + Sync {
    /// Register a veiculo for an existing cliente. The placa must be unused.
    async fn cadastrar(&self, dados: CadastrarVeiculo) -> AppResult<VeiculoResponse>;

    async fn atualizar(&self, id: Uuid, dados: AtualizarVeiculo) -> AppResult<VeiculoResponse>;

    /// Soft delete
    async fn remover(&self, id: Uuid) -> AppResult<()>;

    /// Veiculo with its cliente
    async fn obter_por_id(&self, id: Uuid) -> AppResult<VeiculoResponse>;

    /// Veiculo with its cliente. Lookup accepts the placa with or without separators
    async fn obter_por_placa(&self, placa: &str) -> AppResult<VeiculoResponse>;

    async fn listar_por_cliente(&self, cliente_id: Uuid) -> AppResult<Vec<VeiculoResponse>>;

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<VeiculoResponse>>;
}

pub struct VeiculoManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
}

impl VeiculoManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl VeiculoService for VeiculoManager {
    async fn cadastrar(&self, mut dados: CadastrarVeiculo) -> AppResult<VeiculoResponse> {
        traced("veiculo.cadastrar", async move {
            dados.placa = normalizar_placa(&dados.placa);
            dados.validate()?;
            let uow = self.persistence.begin();

            uow.clientes()
                .get_one_untracked(&Specification::por_id(dados.cliente_id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Cliente")?;

            if uow
                .veiculos()
                .get_one_untracked(&spec::por_placa(&dados.placa))
                .await?
                .is_some()
            {
                return Err(AppError::already_registered(format!(
                    "Veiculo with placa {}",
                    dados.placa
                )));
            }

            let veiculo = Veiculo::new(dados);
            uow.veiculos().create(&veiculo).await?;
            uow.commit().await?;

            tracing::info!(veiculo_id = %veiculo.base.id, placa = %veiculo.placa, "Veiculo registered");
            Ok(veiculo.into())
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarVeiculo) -> AppResult<VeiculoResponse> {
        traced("veiculo.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut veiculo = uow
                .veiculos()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Veiculo")?;

            veiculo.atualizar(&dados);
            uow.veiculos().update(&veiculo).await?;
            uow.commit().await?;
            Ok(veiculo.into())
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("veiculo.remover", async move {
            let uow = self.persistence.begin();
            uow.veiculos().soft_delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<VeiculoResponse> {
        traced("veiculo.obter_por_id", async move {
            let uow = self.persistence.begin();
            let veiculo = uow
                .veiculos()
                .get_one_untracked(&Specification::por_id(id).with_include(VeiculoInclude::Cliente))
                .await?
                .ok_or_not_found("Veiculo")?;
            Ok(veiculo.into())
        })
        .await
    }

    async fn obter_por_placa(&self, placa: &str) -> AppResult<VeiculoResponse> {
        traced("veiculo.obter_por_placa", async move {
            let uow = self.persistence.begin();
            let veiculo = uow
                .veiculos()
                .get_one_untracked(&spec::por_placa(placa).with_include(VeiculoInclude::Cliente))
                .await?
                .ok_or_not_found("Veiculo")?;
            Ok(veiculo.into())
        })
        .await
    }

    async fn listar_por_cliente(&self, cliente_id: Uuid) -> AppResult<Vec<VeiculoResponse>> {
        traced("veiculo.listar_por_cliente", async move {
            let uow = self.persistence.begin();
            let veiculos = uow
                .veiculos()
                .list_untracked(&spec::por_cliente(cliente_id).and(Specification::ativos()))
                .await?;
            Ok(veiculos.into_iter().map(VeiculoResponse::from).collect())
        })
        .await
    }

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<VeiculoResponse>> {
        traced("veiculo.listar", async move {
            let uow = self.persistence.begin();
            let pagina = paginar(uow.veiculos().as_ref(), Specification::ativos(), params).await?;
            Ok(pagina.map(VeiculoResponse::from))
        })
        .await
    }
}
