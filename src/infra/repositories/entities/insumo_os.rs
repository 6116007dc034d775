//! Insumos da ordem de servico table.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{EntityBase, Estoque, InsumoOs, InsumoOsInclude};
use crate::errors::AppResult;
use crate::infra::repositories::store::{load_by_ids, BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "insumos_os")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ordem_servico_id: Uuid,
    pub estoque_id: Uuid,
    pub quantidade: i32,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ordem_servico::Entity",
        from = "Column::OrdemServicoId",
        to = "super::ordem_servico::Column::Id",
        on_delete = "Cascade"
    )]
    OrdemServico,
    #[sea_orm(
        belongs_to = "super::estoque::Entity",
        from = "Column::EstoqueId",
        to = "super::estoque::Column::Id"
    )]
    Estoque,
}

impl Related<super::ordem_servico::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdemServico.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl Persisted for InsumoOs {
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
        Ok(InsumoOs {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            ordem_servico_id: model.ordem_servico_id,
            estoque_id: model.estoque_id,
            quantidade: model.quantidade,
            estoque: None,
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            ordem_servico_id: Set(self.ordem_servico_id),
            estoque_id: Set(self.estoque_id),
            quantidade: Set(self.quantidade),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }

    async fn load_includes<C>(
        conn: &C,
        rows: &mut [Self],
        includes: &[InsumoOsInclude],
    ) -> AppResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        if rows.is_empty() || !includes.contains(&InsumoOsInclude::Estoque) {
            return Ok(());
        }

        let ids = rows.iter().map(|insumo| insumo.estoque_id).collect();
        let estoques = load_by_ids::<Estoque, C>(conn, ids).await?;
        for insumo in rows.iter_mut() {
            insumo.estoque = estoques.get(&insumo.estoque_id).cloned();
        }
        Ok(())
    }
}
