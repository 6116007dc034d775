//! Migration: estoques and alertas_estoque.

use sea_orm_migration::prelude::*;

use super::entity_table;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                entity_table(Estoques::Table)
                    .col(
                        ColumnDef::new(Estoques::Insumo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Estoques::Descricao).text().not_null())
                    .col(ColumnDef::new(Estoques::Preco).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Estoques::QuantidadeDisponivel)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Estoques::QuantidadeMinima)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                entity_table(AlertasEstoque::Table)
                    .col(ColumnDef::new(AlertasEstoque::EstoqueId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alertas_estoque_estoque")
                            .from(AlertasEstoque::Table, AlertasEstoque::EstoqueId)
                            .to(Estoques::Table, Estoques::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Daily dedup lookups filter on stock item and creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_alertas_estoque_estoque_data")
                    .table(AlertasEstoque::Table)
                    .col(AlertasEstoque::EstoqueId)
                    .col(AlertasEstoque::DataCadastro)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertasEstoque::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Estoques::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Estoques {
    Table,
    Id,
    Insumo,
    Descricao,
    Preco,
    QuantidadeDisponivel,
    QuantidadeMinima,
}

#[derive(Iden)]
enum AlertasEstoque {
    Table,
    EstoqueId,
    DataCadastro,
}
