//! Alertas de estoque table.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{AlertaEstoque, EntityBase};
use crate::errors::AppResult;
use crate::infra::repositories::store::{BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "alertas_estoque")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub estoque_id: Uuid,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::estoque::Entity",
        from = "Column::EstoqueId",
        to = "super::estoque::Column::Id"
    )]
    Estoque,
}

impl ActiveModelBehavior for ActiveModel {}

impl Persisted for AlertaEstoque {
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
        Ok(AlertaEstoque {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            estoque_id: model.estoque_id,
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            estoque_id: Set(self.estoque_id),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }
}
