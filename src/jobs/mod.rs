//! Batch jobs run on an external schedule.
//!
//! Each job opens one unit of work and commits it once. A failure aborts
//! the run with nothing committed.

mod orcamento_expirado;

pub use orcamento_expirado::OrcamentoExpiradoJob;
