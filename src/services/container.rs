//! Service Container - Centralized service access.
//!
//! Holds one instance of every application service behind its trait so
//! callers (CLI commands, jobs, tests) depend on abstractions only.

use std::sync::Arc;

use super::{
    AlertaEstoqueManager, AlertaEstoqueService, AuthService, Authenticator, ClienteManager,
    ClienteService, EstoqueManager, EstoqueService, OrdemServicoManager, OrdemServicoService,
    ServicoManager, ServicoService, UsuarioManager, UsuarioService, VeiculoManager,
    VeiculoService,
};
use crate::config::Config;
use crate::infra::{AlertaNotifier, LogNotifier, Persistence, UnitOfWorkFactory};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn clientes(&self) -> Arc<dyn ClienteService>;

    fn veiculos(&self) -> Arc<dyn VeiculoService>;

    fn servicos(&self) -> Arc<dyn ServicoService>;

    fn estoques(&self) -> Arc<dyn EstoqueService>;

    fn alertas_estoque(&self) -> Arc<dyn AlertaEstoqueService>;

    fn ordens_servico(&self) -> Arc<dyn OrdemServicoService>;

    fn usuarios(&self) -> Arc<dyn UsuarioService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    clientes: Arc<dyn ClienteService>,
    veiculos: Arc<dyn VeiculoService>,
    servicos: Arc<dyn ServicoService>,
    estoques: Arc<dyn EstoqueService>,
    alertas_estoque: Arc<dyn AlertaEstoqueService>,
    ordens_servico: Arc<dyn OrdemServicoService>,
    usuarios: Arc<dyn UsuarioService>,
}

impl Services {
    /// Wire every service over one unit-of-work factory and notifier
    pub fn new(
        persistence: Arc<dyn UnitOfWorkFactory>,
        notifier: Arc<dyn AlertaNotifier>,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(persistence.clone(), config)),
            clientes: Arc::new(ClienteManager::new(persistence.clone())),
            veiculos: Arc::new(VeiculoManager::new(persistence.clone())),
            servicos: Arc::new(ServicoManager::new(persistence.clone())),
            estoques: Arc::new(EstoqueManager::new(persistence.clone(), notifier.clone())),
            alertas_estoque: Arc::new(AlertaEstoqueManager::new(
                persistence.clone(),
                notifier.clone(),
            )),
            ordens_servico: Arc::new(OrdemServicoManager::new(persistence.clone(), notifier)),
            usuarios: Arc::new(UsuarioManager::new(persistence)),
        }
    }

    /// Create service container from database connection and config.
    /// Alerts are written to the log.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::new(
            Arc::new(Persistence::new(db)),
            Arc::new(LogNotifier),
            config,
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn clientes(&self) -> Arc<dyn ClienteService> {
        self.clientes.clone()
    }

    fn veiculos(&self) -> Arc<dyn VeiculoService> {
        self.veiculos.clone()
    }

    fn servicos(&self) -> Arc<dyn ServicoService> {
        self.servicos.clone()
    }

    fn estoques(&self) -> Arc<dyn EstoqueService> {
        self.estoques.clone()
    }

    fn alertas_estoque(&self) -> Arc<dyn AlertaEstoqueService> {
        self.alertas_estoque.clone()
    }

    fn ordens_servico(&self) -> Arc<dyn OrdemServicoService> {
        self.ordens_servico.clone()
    }

    fn usuarios(&self) -> Arc<dyn UsuarioService> {
        self.usuarios.clone()
    }
}
