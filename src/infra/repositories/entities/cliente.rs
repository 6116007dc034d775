//! Clientes table. Endereco and contato are flattened into prefixed columns.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

use super::veiculo;
use crate::domain::{Cliente, ClienteInclude, Contato, EntityBase, Endereco, Veiculo};
use crate::errors::AppResult;
use crate::infra::repositories::store::{from_models, BaseColumns, Persisted};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nome: String,
    #[sea_orm(unique)]
    pub documento: String,
    pub tipo_cliente: String,
    pub sexo: Option<String>,
    pub data_nascimento: Option<Date>,
    pub endereco_rua: String,
    pub endereco_numero: String,
    pub endereco_bairro: String,
    pub endereco_cidade: String,
    pub endereco_estado: String,
    pub endereco_cep: String,
    pub endereco_complemento: Option<String>,
    pub contato_telefone: String,
    pub contato_email: String,
    pub data_cadastro: DateTimeUtc,
    pub data_atualizacao: Option<DateTimeUtc>,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::veiculo::Entity")]
    Veiculos,
}

impl Related<super::veiculo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Veiculos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl Persisted for Cliente {
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
        Ok(Cliente {
            base: EntityBase {
                id: model.id,
                data_cadastro: model.data_cadastro,
                data_atualizacao: model.data_atualizacao,
                ativo: model.ativo,
            },
            nome: model.nome,
            documento: model.documento,
            tipo_cliente: model.tipo_cliente.parse()?,
            sexo: model.sexo.as_deref().map(str::parse).transpose()?,
            data_nascimento: model.data_nascimento,
            endereco: Endereco {
                rua: model.endereco_rua,
                numero: model.endereco_numero,
                bairro: model.endereco_bairro,
                cidade: model.endereco_cidade,
                estado: model.endereco_estado,
                cep: model.endereco_cep,
                complemento: model.endereco_complemento,
            },
            contato: Contato {
                telefone: model.contato_telefone,
                email: model.contato_email,
            },
            veiculos: Vec::new(),
        })
    }

    fn into_active(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.base.id),
            nome: Set(self.nome.clone()),
            documento: Set(self.documento.clone()),
            tipo_cliente: Set(self.tipo_cliente.as_str().to_string()),
            sexo: Set(self.sexo.map(|sexo| sexo.as_str().to_string())),
            data_nascimento: Set(self.data_nascimento),
            endereco_rua: Set(self.endereco.rua.clone()),
            endereco_numero: Set(self.endereco.numero.clone()),
            endereco_bairro: Set(self.endereco.bairro.clone()),
            endereco_cidade: Set(self.endereco.cidade.clone()),
            endereco_estado: Set(self.endereco.estado.clone()),
            endereco_cep: Set(self.endereco.cep.clone()),
            endereco_complemento: Set(self.endereco.complemento.clone()),
            contato_telefone: Set(self.contato.telefone.clone()),
            contato_email: Set(self.contato.email.clone()),
            data_cadastro: Set(self.base.data_cadastro),
            data_atualizacao: Set(self.base.data_atualizacao),
            ativo: Set(self.base.ativo),
        }
    }

    async fn load_includes<C>(
        conn: &C,
        rows: &mut [Self],
        includes: &[ClienteInclude],
    ) -> AppResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        if rows.is_empty() || !includes.contains(&ClienteInclude::Veiculos) {
            return Ok(());
        }

        let ids: Vec<Uuid> = rows.iter().map(|cliente| cliente.base.id).collect();
        let models = veiculo::Entity::find()
            .filter(veiculo::Column::ClienteId.is_in(ids))
            .order_by_asc(veiculo::Column::DataCadastro)
            .all(conn)
            .await?;

        let mut por_cliente: HashMap<Uuid, Vec<Veiculo>> = HashMap::new();
        for veiculo in from_models::<Veiculo>(models)? {
            por_cliente.entry(veiculo.cliente_id).or_default().push(veiculo);
        }
        for cliente in rows.iter_mut() {
            cliente.veiculos = por_cliente.remove(&cliente.base.id).unwrap_or_default();
        }
        Ok(())
    }
}
