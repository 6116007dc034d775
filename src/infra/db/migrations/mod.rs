//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_cadastro_tables;
mod m20240101_000002_create_estoque_tables;
mod m20240101_000003_create_ordem_servico_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_cadastro_tables::Migration),
            Box::new(m20240101_000002_create_estoque_tables::Migration),
            Box::new(m20240101_000003_create_ordem_servico_tables::Migration),
        ]
    }
}

/// Create statement carrying the identity and audit columns every table has
fn entity_table<T: IntoTableRef>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new("id"))
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new("data_cadastro"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("data_atualizacao"))
                .timestamp_with_time_zone()
                .null(),
        )
        .col(
            ColumnDef::new(Alias::new("ativo"))
                .boolean()
                .not_null()
                .default(true),
        )
        .to_owned()
}
