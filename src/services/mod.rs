//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Every operation opens its own unit of work from a
//! [`UnitOfWorkFactory`](crate::infra::UnitOfWorkFactory) and commits it once.

mod alerta_estoque_service;
mod auth_service;
mod cliente_service;
pub mod container;
mod estoque_service;
mod ordem_servico_service;
mod servico_service;
mod usuario_service;
mod veiculo_service;

use std::future::Future;

use crate::domain::DomainEntity;
use crate::errors::AppResult;
use crate::infra::Gateway;
use crate::specifications::Specification;
use crate::types::{Paginated, PaginationParams};

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use alerta_estoque_service::{AlertaEstoqueManager, AlertaEstoqueService, VerificacaoEstoque};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use cliente_service::{ClienteManager, ClienteService};
pub use estoque_service::{EstoqueManager, EstoqueService};
pub(crate) use ordem_servico_service::devolver_insumos;
pub use ordem_servico_service::{OrdemServicoManager, OrdemServicoService};
pub use servico_service::{ServicoManager, ServicoService};
pub use usuario_service::{UsuarioManager, UsuarioService};
pub use veiculo_service::{VeiculoManager, VeiculoService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

/// Run one use case, logging start, success and failure.
///
/// The error is returned unchanged.
pub(crate) async fn traced<T, F>(operation: &'static str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tracing::debug!(operation, "Use case started");
    match future.await {
        Ok(value) => {
            tracing::info!(operation, "Use case completed");
            Ok(value)
        }
        Err(error) => {
            tracing::error!(operation, code = error.code(), error = %error, "Use case failed");
            Err(error)
        }
    }
}

/// One page of `spec` plus the total of matching rows
pub(crate) async fn paginar<T: DomainEntity>(
    gateway: &dyn Gateway<T>,
    spec: Specification<T>,
    params: PaginationParams,
) -> AppResult<Paginated<T>> {
    let total = gateway.count(&spec).await?;
    let data = gateway.list_untracked(&spec.paged(params)).await?;
    Ok(Paginated::new(data, params, total))
}
