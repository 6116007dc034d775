//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Gateways over SeaORM and over an in-memory store
//! - Unit of Work for transaction management
//! - Alert delivery

pub mod db;
pub mod memory;
pub mod notifier;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, EstadoMigracao, Migrator};
pub use memory::{MemoryDatabase, MemoryEntity, MemoryGateway, MemoryPersistence, MemoryUnitOfWork};
pub use notifier::{AlertaNotifier, LogNotifier};
pub use repositories::{Gateway, GatewayExt, Persisted, SeaGateway};
pub use unit_of_work::{DbSession, Persistence, SeaUnitOfWork, UnitOfWork, UnitOfWorkFactory};

#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockAlertaNotifier;
