//! Migrate command - Schema management for the shop tables.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, EstadoMigracao};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Schema up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Last migration reverted");
        }
        MigrateAction::Status => {
            let estados = db.migration_status().await?;
            print!("{}", relatorio(&estados));
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table, shop data will be lost");
            db.fresh_migrations().await?;
            tracing::info!("Schema rebuilt");
        }
    }

    Ok(())
}

/// One line per migration followed by the pending count
fn relatorio(estados: &[EstadoMigracao]) -> String {
    let mut saida = String::new();
    for estado in estados {
        let marca = if estado.aplicada { "applied" } else { "pending" };
        saida.push_str(&format!("{}: {}\n", estado.nome, marca));
    }
    let pendentes = estados.iter().filter(|estado| !estado.aplicada).count();
    saida.push_str(&format!("{} pending\n", pendentes));
    saida
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relatorio_lists_each_migration() {
        let estados = vec![
            EstadoMigracao {
                nome: "m20240101_000001_create_cadastro_tables".to_string(),
                aplicada: true,
            },
            EstadoMigracao {
                nome: "m20240101_000002_create_estoque_tables".to_string(),
                aplicada: false,
            },
        ];

        assert_eq!(
            relatorio(&estados),
            "m20240101_000001_create_cadastro_tables: applied\n\
             m20240101_000002_create_estoque_tables: pending\n\
             1 pending\n"
        );
    }
}
