//! Migration: ordens_servico and insumos_os.

use sea_orm_migration::prelude::*;

use super::entity_table;
use super::m20240101_000001_create_cadastro_tables::{Clientes, Servicos, Veiculos};
use super::m20240101_000002_create_estoque_tables::Estoques;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                entity_table(OrdensServico::Table)
                    .col(ColumnDef::new(OrdensServico::ClienteId).uuid().not_null())
                    .col(ColumnDef::new(OrdensServico::VeiculoId).uuid().not_null())
                    .col(ColumnDef::new(OrdensServico::ServicoId).uuid().not_null())
                    .col(ColumnDef::new(OrdensServico::Descricao).text().null())
                    .col(ColumnDef::new(OrdensServico::Status).string().not_null())
                    .col(ColumnDef::new(OrdensServico::Orcamento).decimal_len(12, 2).null())
                    .col(
                        ColumnDef::new(OrdensServico::DataEnvioOrcamento)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(OrdensServico::DataFinalizacao)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(OrdensServico::DataEntrega)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordens_servico_cliente")
                            .from(OrdensServico::Table, OrdensServico::ClienteId)
                            .to(Clientes::Table, Clientes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordens_servico_veiculo")
                            .from(OrdensServico::Table, OrdensServico::VeiculoId)
                            .to(Veiculos::Table, Veiculos::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordens_servico_servico")
                            .from(OrdensServico::Table, OrdensServico::ServicoId)
                            .to(Servicos::Table, Servicos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The expiry job scans by status and budget timestamp
        manager
            .create_index(
                Index::create()
                    .name("idx_ordens_servico_status_envio")
                    .table(OrdensServico::Table)
                    .col(OrdensServico::Status)
                    .col(OrdensServico::DataEnvioOrcamento)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                entity_table(InsumosOs::Table)
                    .col(ColumnDef::new(InsumosOs::OrdemServicoId).uuid().not_null())
                    .col(ColumnDef::new(InsumosOs::EstoqueId).uuid().not_null())
                    .col(ColumnDef::new(InsumosOs::Quantidade).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insumos_os_ordem_servico")
                            .from(InsumosOs::Table, InsumosOs::OrdemServicoId)
                            .to(OrdensServico::Table, OrdensServico::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insumos_os_estoque")
                            .from(InsumosOs::Table, InsumosOs::EstoqueId)
                            .to(Estoques::Table, Estoques::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_insumos_os_ordem_servico_id")
                    .table(InsumosOs::Table)
                    .col(InsumosOs::OrdemServicoId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InsumosOs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrdensServico::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrdensServico {
    Table,
    Id,
    ClienteId,
    VeiculoId,
    ServicoId,
    Descricao,
    Status,
    Orcamento,
    DataEnvioOrcamento,
    DataFinalizacao,
    DataEntrega,
}

#[derive(Iden)]
enum InsumosOs {
    Table,
    OrdemServicoId,
    EstoqueId,
    Quantidade,
}
