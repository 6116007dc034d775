//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::domain::TipoUsuario;

/// Oficina Mecânica - Mechanic-shop management
#[derive(Parser, Debug)]
#[command(name = "oficina")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Run scheduled batch jobs
    Jobs(JobsArgs),

    /// Manage staff accounts
    Usuarios(UsuariosArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the jobs command
#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

/// Batch jobs
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Expire unanswered budgets and return their stock
    ExpireBudgets {
        /// Budget validity in days (defaults to ORCAMENTO_VALIDADE_DIAS)
        #[arg(long)]
        dias: Option<i64>,
    },
    /// Alert subscribers about critical stock items
    CheckStock,
}

/// Arguments for the usuarios command
#[derive(Parser, Debug)]
pub struct UsuariosArgs {
    #[command(subcommand)]
    pub action: UsuariosAction,
}

#[derive(Subcommand, Debug)]
pub enum UsuariosAction {
    /// Register a staff account
    Cadastrar {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        email: String,
        /// Plain password, hashed before storage
        #[arg(long, env = "OFICINA_SENHA", hide_env_values = true)]
        senha: String,
        /// admin, mecanico or recepcionista
        #[arg(long, default_value = "mecanico")]
        tipo: TipoUsuario,
        /// Receive critical stock alerts
        #[arg(long)]
        recebe_alerta_estoque: bool,
    },
}
