//! Ordens de servico table.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

use super::insumo_os;
use crate::domain::{
    Cliente, EntityBase, InsumoOs, InsumoOsInclude, OrdemServico, OrdemServicoInclude, Servico,
    Veiculo,
};
use crate::errors::AppResult;
use crate::infra::repositories::store::{from_models, load_by_ids, BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ordens_servico")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,
    pub servico_id: Uuid,
    pub descricao: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub orcamento: Option<Decimal>,
    pub data_envio_orcamento: Option<DateTimeUtc>,
    pub data_finalizacao: Option<DateTimeUtc>,
    pub data_entrega: Option<DateTimeUtc>,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::insumo_os::Entity")]
    Insumos,
}

impl Related<super::insumo_os::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Insumos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl Persisted for OrdemServico {
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
        Ok(OrdemServico {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            cliente_id: model.cliente_id,
            veiculo_id: model.veiculo_id,
            servico_id: model.servico_id,
            descricao: model.descricao,
            status: model.status.parse()?,
            orcamento: model.orcamento,
            data_envio_orcamento: model.data_envio_orcamento,
            data_finalizacao: model.data_finalizacao,
            data_entrega: model.data_entrega,
            cliente: None,
            veiculo: None,
            servico: None,
            insumos: Vec::new(),
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            cliente_id: Set(self.cliente_id),
            veiculo_id: Set(self.veiculo_id),
            servico_id: Set(self.servico_id),
            descricao: Set(self.descricao.clone()),
            status: Set(self.status.as_str().to_string()),
            orcamento: Set(self.orcamento),
            data_envio_orcamento: Set(self.data_envio_orcamento),
            data_finalizacao: Set(self.data_finalizacao),
            data_entrega: Set(self.data_entrega),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }

    async fn load_includes<C>(
        conn: &C,
        rows: &mut [Self],
        includes: &[OrdemServicoInclude],
    ) -> AppResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        if rows.is_empty() {
            return Ok(());
        }

        for include in includes {
            match include {
                OrdemServicoInclude::Cliente => {
                    let ids = rows.iter().map(|ordem| ordem.cliente_id).collect();
                    let clientes = load_by_ids::<Cliente, C>(conn, ids).await?;
                    for ordem in rows.iter_mut() {
                        ordem.cliente = clientes.get(&ordem.cliente_id).cloned();
                    }
                }
                OrdemServicoInclude::Veiculo => {
                    let ids = rows.iter().map(|ordem| ordem.veiculo_id).collect();
                    let veiculos = load_by_ids::<Veiculo, C>(conn, ids).await?;
                    for ordem in rows.iter_mut() {
                        ordem.veiculo = veiculos.get(&ordem.veiculo_id).cloned();
                    }
                }
                OrdemServicoInclude::Servico => {
                    let ids = rows.iter().map(|ordem| ordem.servico_id).collect();
                    let servicos = load_by_ids::<Servico, C>(conn, ids).await?;
                    for ordem in rows.iter_mut() {
                        ordem.servico = servicos.get(&ordem.servico_id).cloned();
                    }
                }
                OrdemServicoInclude::Insumos => {
                    let ids: Vec<Uuid> = rows.iter().map(|ordem| ordem.base.id).collect();
                    let models = insumo_os::Entity::find()
                        .filter(insumo_os::Column::OrdemServicoId.is_in(ids))
                        .order_by_asc(insumo_os::Column::DataCadastro)
                        .all(conn)
                        .await?;
                    let mut insumos = from_models::<InsumoOs>(models)?;
                    InsumoOs::load_includes(conn, &mut insumos, &[InsumoOsInclude::Estoque])
                        .await?;

                    let mut por_ordem: HashMap<Uuid, Vec<InsumoOs>> = HashMap::new();
                    for insumo in insumos {
                        por_ordem.entry(insumo.ordem_servico_id).or_default().push(insumo);
                    }
                    for ordem in rows.iter_mut() {
                        ordem.insumos = por_ordem.remove(&ordem.base.id).unwrap_or_default();
                    }
                }
            }
        }
        Ok(())
    }
}
