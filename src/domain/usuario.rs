//! Usuario (system user) domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{DomainEntity, EntityBase, NoInclude};
use super::password::Password;
use super::validation::apply_text;
use crate::config::{
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, TIPO_USUARIO_ADMIN, TIPO_USUARIO_MECANICO,
    TIPO_USUARIO_RECEPCIONISTA,
};
use crate::errors::{AppError, AppResult};

/// User types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Admin,
    Mecanico,
    Recepcionista,
}

impl TipoUsuario {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoUsuario::Admin => TIPO_USUARIO_ADMIN,
            TipoUsuario::Mecanico => TIPO_USUARIO_MECANICO,
            TipoUsuario::Recepcionista => TIPO_USUARIO_RECEPCIONISTA,
        }
    }

    /// Check if this type has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, TipoUsuario::Admin)
    }
}

impl std::str::FromStr for TipoUsuario {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIPO_USUARIO_ADMIN => Ok(TipoUsuario::Admin),
            TIPO_USUARIO_MECANICO => Ok(TipoUsuario::Mecanico),
            TIPO_USUARIO_RECEPCIONISTA => Ok(TipoUsuario::Recepcionista),
            other => Err(AppError::invalid(format!("Unknown tipo_usuario '{}'", other))),
        }
    }
}

impl std::fmt::Display for TipoUsuario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuario domain entity
#[derive(Debug, Clone)]
pub struct Usuario {
    pub base: EntityBase,
    pub nome: String,
    pub email: String,
    pub senha: Password,
    pub tipo_usuario: TipoUsuario,
    /// Receives critical stock alerts
    pub recebe_alerta_estoque: bool,
}

impl DomainEntity for Usuario {
    type Include = NoInclude;
    const NAME: &'static str = "Usuario";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl Usuario {
    /// Create a new user, hashing the plain password
    pub fn new(dados: CadastrarUsuario) -> AppResult<Self> {
        Ok(Self {
            base: EntityBase::new(),
            nome: dados.nome.trim().to_string(),
            email: normalizar_email(&dados.email),
            senha: Password::new(&dados.senha)?,
            tipo_usuario: dados.tipo_usuario,
            recebe_alerta_estoque: dados.recebe_alerta_estoque,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.tipo_usuario.is_admin()
    }

    /// Partial update. A new password is re-hashed.
    pub fn atualizar(&mut self, dados: &AtualizarUsuario) -> AppResult<()> {
        let mut changed = apply_text(&mut self.nome, dados.nome.as_deref());

        if let Some(tipo) = dados.tipo_usuario {
            if tipo != self.tipo_usuario {
                self.tipo_usuario = tipo;
                changed = true;
            }
        }
        if let Some(recebe) = dados.recebe_alerta_estoque {
            if recebe != self.recebe_alerta_estoque {
                self.recebe_alerta_estoque = recebe;
                changed = true;
            }
        }
        if let Some(senha) = dados.senha.as_deref().filter(|s| !s.is_empty()) {
            self.senha = Password::new(senha)?;
            changed = true;
        }

        if changed {
            self.base.touch();
        }
        Ok(())
    }
}

pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Usuario creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarUsuario {
    #[validate(length(min = MIN_NAME_LENGTH, max = 120, message = "Nome is required"))]
    pub nome: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub senha: String,
    pub tipo_usuario: TipoUsuario,
    #[serde(default)]
    pub recebe_alerta_estoque: bool,
}

/// Usuario update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarUsuario {
    #[validate(length(max = 120, message = "Nome is too long"))]
    pub nome: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub senha: Option<String>,
    pub tipo_usuario: Option<TipoUsuario>,
    pub recebe_alerta_estoque: Option<bool>,
}

/// Usuario response (safe to return to client, no password)
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioResponse {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub tipo_usuario: TipoUsuario,
    pub recebe_alerta_estoque: bool,
    pub ativo: bool,
    pub data_cadastro: DateTime<Utc>,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: usuario.base.id,
            nome: usuario.nome,
            email: usuario.email,
            tipo_usuario: usuario.tipo_usuario,
            recebe_alerta_estoque: usuario.recebe_alerta_estoque,
            ativo: usuario.base.ativo,
            data_cadastro: usuario.base.data_cadastro,
        }
    }
}
