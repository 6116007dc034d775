//! Jobs command - Scheduled batch jobs.
//!
//! Meant to be invoked by cron or any external scheduler:
//!
//! ```bash
//! # Expire unanswered budgets and return their stock
//! cargo run -- jobs expire-budgets
//!
//! # Alert subscribers about critical stock, prints a JSON summary
//! cargo run -- jobs check-stock
//! ```

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, LogNotifier};
use crate::jobs::OrcamentoExpiradoJob;
use crate::services::{AlertaEstoqueManager, AlertaEstoqueService};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Arc::new(db.persistence());

    match args.action {
        JobsAction::ExpireBudgets { dias } => {
            let validade = match dias {
                Some(dias) if dias > 0 => Duration::days(dias),
                Some(dias) => {
                    return Err(AppError::invalid(format!(
                        "Budget validity must be positive, got {} days",
                        dias
                    )))
                }
                None => config.orcamento_validade(),
            };

            let expiradas = OrcamentoExpiradoJob::new(persistence, validade)
                .executar(Utc::now())
                .await?;
            println!("Expired {} budget(s).", expiradas);
        }
        JobsAction::CheckStock => {
            let verificacao = AlertaEstoqueManager::new(persistence, Arc::new(LogNotifier))
                .verificar_estoques_criticos()
                .await?;
            let resumo = serde_json::to_string(&verificacao)
                .map_err(|e| AppError::internal(e.to_string()))?;
            println!("{}", resumo);
        }
    }

    Ok(())
}
