//! Veiculos table.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Cliente, EntityBase, Veiculo, VeiculoInclude};
use crate::errors::AppResult;
use crate::infra::repositories::store::{load_by_ids, BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "veiculos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cliente_id: Uuid,
    #[sea_orm(unique)]
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub cor: String,
    pub ano: i32,
    pub anotacoes: Option<String>,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::ClienteId",
        to = "super::cliente::Column::Id"
    )]
    Cliente,
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl Persisted for Veiculo {
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
        Ok(Veiculo {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            cliente_id: model.cliente_id,
            placa: model.placa,
            marca: model.marca,
            modelo: model.modelo,
            cor: model.cor,
            ano: model.ano,
            anotacoes: model.anotacoes,
            cliente: None,
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            cliente_id: Set(self.cliente_id),
            placa: Set(self.placa.clone()),
            marca: Set(self.marca.clone()),
            modelo: Set(self.modelo.clone()),
            cor: Set(self.cor.clone()),
            ano: Set(self.ano),
            anotacoes: Set(self.anotacoes.clone()),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }

    async fn load_includes<C>(
        conn: &C,
        rows: &mut [Self],
        includes: &[VeiculoInclude],
    ) -> AppResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        if rows.is_empty() || !includes.contains(&VeiculoInclude::Cliente) {
            return Ok(());
        }

        let ids = rows.iter().map(|veiculo| veiculo.cliente_id).collect();
        let clientes = load_by_ids::<Cliente, C>(conn, ids).await?;
        for veiculo in rows.iter_mut() {
            veiculo.cliente = clientes.get(&veiculo.cliente_id).cloned();
        }
        Ok(())
    }
}
