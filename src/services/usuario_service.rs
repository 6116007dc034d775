//! Usuario (staff account) use cases.
//!
//! Responses never carry the password hash.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{paginar, traced};
use crate::domain::{AtualizarUsuario, CadastrarUsuario, Usuario, UsuarioResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWorkFactory;
use crate::specifications::{usuario as spec, Specification};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait UsuarioService: Send + Sync {
    /// Register a user. Emails are unique, deactivated accounts included.
    async fn cadastrar(&self, dados: CadastrarUsuario) -> AppResult<UsuarioResponse>;

    /// Partial update. A new password is re-hashed.
    async fn atualizar(&self, id: Uuid, dados: AtualizarUsuario) -> AppResult<UsuarioResponse>;

    /// Soft delete, blocks login
    async fn desativar(&self, id: Uuid) -> AppResult<()>;

    /// Permanently delete
    async fn remover(&self, id: Uuid) -> AppResult<()>;

    async fn obter_por_id(&self, id: Uuid) -> AppResult<UsuarioResponse>;

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<UsuarioResponse>>;
}

pub struct UsuarioManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
}

impl UsuarioManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl UsuarioService for UsuarioManager {
    async fn cadastrar(&self, dados: CadastrarUsuario) -> AppResult<UsuarioResponse> {
        traced("usuario.cadastrar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            if uow
                .usuarios()
                .get_one_untracked(&spec::por_email(&dados.email))
                .await?
                .is_some()
            {
                return Err(AppError::already_registered("Usuario with this email"));
            }

            let usuario = Usuario::new(dados)?;
            uow.usuarios().create(&usuario).await?;
            uow.commit().await?;

            tracing::info!(usuario_id = %usuario.base.id, tipo = %usuario.tipo_usuario, "Usuario registered");
            Ok(usuario.into())
        })
        .await
    }

    async fn atualizar(&self, id: Uuid, dados: AtualizarUsuario) -> AppResult<UsuarioResponse> {
        traced("usuario.atualizar", async move {
            dados.validate()?;
            let uow = self.persistence.begin();

            let mut usuario = uow
                .usuarios()
                .get_one(&Specification::por_id(id).and(Specification::ativos()))
                .await?
                .ok_or_not_found("Usuario")?;

            usuario.atualizar(&dados)?;
            uow.usuarios().update(&usuario).await?;
            uow.commit().await?;
            Ok(usuario.into())
        })
        .await
    }

    async fn desativar(&self, id: Uuid) -> AppResult<()> {
        traced("usuario.desativar", async move {
            let uow = self.persistence.begin();
            uow.usuarios().soft_delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn remover(&self, id: Uuid) -> AppResult<()> {
        traced("usuario.remover", async move {
            let uow = self.persistence.begin();
            uow.usuarios().delete(id).await?;
            uow.commit().await?;
            Ok(())
        })
        .await
    }

    async fn obter_por_id(&self, id: Uuid) -> AppResult<UsuarioResponse> {
        traced("usuario.obter_por_id", async move {
            let uow = self.persistence.begin();
            let usuario = uow.usuarios().get_by_id(id).await?.ok_or_not_found("Usuario")?;
            Ok(usuario.into())
        })
        .await
    }

    async fn listar(&self, params: PaginationParams) -> AppResult<Paginated<UsuarioResponse>> {
        traced("usuario.listar", async move {
            let uow = self.persistence.begin();
            let pagina = paginar(uow.usuarios().as_ref(), Specification::ativos(), params).await?;
            Ok(pagina.map(UsuarioResponse::from))
        })
        .await
    }
}
