//! Oficina Mecânica - Mechanic-shop management core
//!
//! Customers, vehicles, services, stock, service orders with budgeting,
//! and user authentication on top of a layered architecture.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **specifications**: Composable query filters and the query evaluator
//! - **services**: Application use cases
//! - **jobs**: Batch jobs invoked on an external schedule
//! - **infra**: Infrastructure concerns (database, gateways, unit of work)
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Expire stale budgets (meant for cron)
//! cargo run -- jobs expire-budgets
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod specifications;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{
    AlertaEstoque, Cliente, DomainEntity, Estoque, InsumoOs, OrdemServico, Password, Servico,
    StatusOrdemServico, Usuario, Veiculo,
};
pub use errors::{AppError, AppResult};
pub use specifications::{Projection, Specification};
