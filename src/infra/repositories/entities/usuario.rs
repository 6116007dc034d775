//! Usuarios table.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{EntityBase, Password, Usuario};
use crate::errors::AppResult;
use crate::infra::repositories::store::{BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nome: String,
    #[sea_orm(unique)]
    pub email: String,
    pub senha_hash: String,
    pub tipo_usuario: String,
    pub recebe_alerta_estoque: bool,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    /// Soft delete flag (false = deactivated)
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl Persisted for Usuario {
    type Db = Entity;
    type Model = Model;
    type Active = ActiveModel;

    fn columns() -> BaseColumns<Column> {
        BaseColumns {
            id: Column::Id,
            data_cadastro: Column::DataCadastro,
            data_atualizacao: Column::DataAtualizacao,
            ativo: Column::Ativo,
        }
    }

    fn from_model(model: Model) -> AppResult<Self> {
        Ok(Usuario {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            nome: model.nome,
            email: model.email,
            senha: Password::from_hash(model.senha_hash),
            tipo_usuario: model.tipo_usuario.parse()?,
            recebe_alerta_estoque: model.recebe_alerta_estoque,
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            nome: Set(self.nome.clone()),
            email: Set(self.email.clone()),
            senha_hash: Set(self.senha.as_str().to_string()),
            tipo_usuario: Set(self.tipo_usuario.as_str().to_string()),
            recebe_alerta_estoque: Set(self.recebe_alerta_estoque),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }
}
