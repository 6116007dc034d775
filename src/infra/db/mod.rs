//! Database connection and schema management.

use sea_orm::{Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::{MigrationStatus, MigratorTrait};
use serde::Serialize;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::unit_of_work::Persistence;

pub mod migrations;

pub use migrations::Migrator;

/// One migration known to the binary and whether the schema has it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstadoMigracao {
    pub nome: String,
    pub aplicada: bool,
}

#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and bring the schema up to date. Used by every command that
    /// touches shop data.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let db = Self::connect_without_migrations(config).await?;

        let pendentes = Migrator::get_pending_migrations(&db.connection).await?.len();
        if pendentes > 0 {
            tracing::info!(pendentes, "Applying pending migrations");
            Migrator::up(&db.connection, None).await.inspect_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
            })?;
        }

        Ok(db)
    }

    /// Connect leaving the schema as it is
    pub async fn connect_without_migrations(config: &Config) -> AppResult<Self> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        tracing::debug!("Database connected");
        Ok(Self { connection })
    }

    /// Unit-of-work factory over this connection
    pub fn persistence(&self) -> Persistence {
        Persistence::new(self.connection.clone())
    }

    pub async fn run_migrations(&self) -> AppResult<()> {
        Ok(Migrator::up(&self.connection, None).await?)
    }

    /// Revert the most recent migration
    pub async fn rollback_migration(&self) -> AppResult<()> {
        Ok(Migrator::down(&self.connection, Some(1)).await?)
    }

    /// Every migration in declaration order
    pub async fn migration_status(&self) -> AppResult<Vec<EstadoMigracao>> {
        Ok(Migrator::get_migration_with_status(&self.connection)
            .await?
            .iter()
            .map(|migracao| EstadoMigracao {
                nome: migracao.name().to_string(),
                aplicada: matches!(migracao.status(), MigrationStatus::Applied),
            })
            .collect())
    }

    /// Drop every table and rebuild the schema. Shop data is lost.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        Ok(Migrator::fresh(&self.connection).await?)
    }
}
