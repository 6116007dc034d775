//! Repository layer - Data access abstraction
//!
//! Gateways provide an abstraction over data persistence. The contract is
//! in [`base`], the SeaORM implementation in [`store`] and the table models
//! in `entities`.

mod base;
pub(crate) mod entities;
mod store;

pub use base::{Gateway, GatewayExt};
pub use store::{BaseColumns, Persisted, SeaGateway};
