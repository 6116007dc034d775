//! SeaORM entity definitions
//!
//! Table models, separate from the domain entities. Each file also holds
//! the [`Persisted`](super::store::Persisted) mapping for its entity.

pub mod alerta_estoque;
pub mod cliente;
pub mod estoque;
pub mod insumo_os;
pub mod ordem_servico;
pub mod servico;
pub mod usuario;
pub mod veiculo;
