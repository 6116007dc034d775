//! Estoques table.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{EntityBase, Estoque};
use crate::errors::AppResult;
use crate::infra::repositories::store::{BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "estoques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub insumo: String,
    pub descricao: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub preco: Decimal,
    pub quantidade_disponivel: i32,
    pub quantidade_minima: i32,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Persisted for Estoque {
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
        Ok(Estoque {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            insumo: model.insumo,
            descricao: model.descricao,
            preco: model.preco,
            quantidade_disponivel: model.quantidade_disponivel,
            quantidade_minima: model.quantidade_minima,
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            insumo: Set(self.insumo.clone()),
            descricao: Set(self.descricao.clone()),
            preco: Set(self.preco),
            quantidade_disponivel: Set(self.quantidade_disponivel),
            quantidade_minima: Set(self.quantidade_minima),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }
}
