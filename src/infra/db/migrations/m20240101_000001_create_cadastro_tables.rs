//! Migration: clientes, veiculos, servicos and usuarios.

use sea_orm_migration::prelude::*;

use super::entity_table;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                entity_table(Clientes::Table)
                    .col(ColumnDef::new(Clientes::Nome).string().not_null())
                    .col(
                        ColumnDef::new(Clientes::Documento)
                            .string_len(14)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Clientes::TipoCliente).string().not_null())
                    .col(ColumnDef::new(Clientes::Sexo).string().null())
                    .col(ColumnDef::new(Clientes::DataNascimento).date().null())
                    .col(ColumnDef::new(Clientes::EnderecoRua).string().not_null())
                    .col(ColumnDef::new(Clientes::EnderecoNumero).string().not_null())
                    .col(ColumnDef::new(Clientes::EnderecoBairro).string().not_null())
                    .col(ColumnDef::new(Clientes::EnderecoCidade).string().not_null())
                    .col(ColumnDef::new(Clientes::EnderecoEstado).string_len(2).not_null())
                    .col(ColumnDef::new(Clientes::EnderecoCep).string_len(8).not_null())
                    .col(ColumnDef::new(Clientes::EnderecoComplemento).string().null())
                    .col(ColumnDef::new(Clientes::ContatoTelefone).string().not_null())
                    .col(ColumnDef::new(Clientes::ContatoEmail).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                entity_table(Veiculos::Table)
                    .col(ColumnDef::new(Veiculos::ClienteId).uuid().not_null())
                    .col(
                        ColumnDef::new(Veiculos::Placa)
                            .string_len(7)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Veiculos::Marca).string().not_null())
                    .col(ColumnDef::new(Veiculos::Modelo).string().not_null())
                    .col(ColumnDef::new(Veiculos::Cor).string().not_null())
                    .col(ColumnDef::new(Veiculos::Ano).integer().not_null())
                    .col(ColumnDef::new(Veiculos::Anotacoes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_veiculos_cliente")
                            .from(Veiculos::Table, Veiculos::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_veiculos_cliente_id")
                    .table(Veiculos::Table)
                    .col(Veiculos::ClienteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                entity_table(Servicos::Table)
                    .col(
                        ColumnDef::new(Servicos::Nome)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Servicos::Descricao).text().not_null())
                    .col(ColumnDef::new(Servicos::Valor).decimal_len(12, 2).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                entity_table(Usuarios::Table)
                    .col(ColumnDef::new(Usuarios::Nome).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Usuarios::SenhaHash).string().not_null())
                    .col(ColumnDef::new(Usuarios::TipoUsuario).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::RecebeAlertaEstoque)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Servicos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Veiculos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clientes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Clientes {
    Table,
    Id,
    Nome,
    Documento,
    TipoCliente,
    Sexo,
    DataNascimento,
    EnderecoRua,
    EnderecoNumero,
    EnderecoBairro,
    EnderecoCidade,
    EnderecoEstado,
    EnderecoCep,
    EnderecoComplemento,
    ContatoTelefone,
    ContatoEmail,
}

#[derive(Iden)]
pub(super) enum Veiculos {
    Table,
    Id,
    ClienteId,
    Placa,
    Marca,
    Modelo,
    Cor,
    Ano,
    Anotacoes,
}

#[derive(Iden)]
pub(super) enum Servicos {
    Table,
    Id,
    Nome,
    Descricao,
    Valor,
}

#[derive(Iden)]
enum Usuarios {
    Table,
    Nome,
    Email,
    SenhaHash,
    TipoUsuario,
    RecebeAlertaEstoque,
}
