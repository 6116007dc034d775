//! Unit of Work pattern implementation.
//!
//! One unit of work per request or job run. It hands out gateways that
//! share a single lazily-started transaction and exposes one `commit`
//! that reports whether anything was written.
//!
//! The transaction starts on the first write or tracked read and runs at
//! ReadCommitted. Tracked reads take row locks (`SELECT ... FOR UPDATE`)
//! so two units of work touching the same stock rows serialize.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use tokio::sync::{Mutex, MutexGuard};

use super::repositories::{Gateway, SeaGateway};
use crate::domain::{
    AlertaEstoque, Cliente, Estoque, InsumoOs, OrdemServico, Servico, Usuario, Veiculo,
};
use crate::errors::{AppError, AppResult};

/// Transactional boundary over every gateway
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn clientes(&self) -> Arc<dyn Gateway<Cliente>>;

    fn veiculos(&self) -> Arc<dyn Gateway<Veiculo>>;

    fn servicos(&self) -> Arc<dyn Gateway<Servico>>;

    fn estoques(&self) -> Arc<dyn Gateway<Estoque>>;

    fn ordens_servico(&self) -> Arc<dyn Gateway<OrdemServico>>;

    fn insumos_os(&self) -> Arc<dyn Gateway<InsumoOs>>;

    fn usuarios(&self) -> Arc<dyn Gateway<Usuario>>;

    fn alertas_estoque(&self) -> Arc<dyn Gateway<AlertaEstoque>>;

    /// Persist every staged change. Returns whether anything was written.
    async fn commit(&self) -> AppResult<bool>;

    /// Discard every staged change
    async fn rollback(&self) -> AppResult<()>;
}

/// Starts a fresh unit of work per operation
pub trait UnitOfWorkFactory: Send + Sync {
    fn begin(&self) -> Arc<dyn UnitOfWork>;
}

/// Connection plus the lazily-started transaction of one unit of work
pub struct DbSession {
    db: DatabaseConnection,
    txn: Mutex<Option<DatabaseTransaction>>,
    changes: AtomicU64,
}

impl DbSession {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            txn: Mutex::new(None),
            changes: AtomicU64::new(0),
        }
    }

    /// Plain connection for untracked reads
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Lock the session transaction, starting it on first use
    pub async fn transaction(&self) -> AppResult<MutexGuard<'_, Option<DatabaseTransaction>>> {
        let mut guard = self.txn.lock().await;
        if guard.is_none() {
            let txn = self
                .db
                .begin_with_config(
                    Some(IsolationLevel::ReadCommitted),
                    Some(AccessMode::ReadWrite),
                )
                .await?;
            tracing::debug!("Unit of work transaction started");
            *guard = Some(txn);
        }
        Ok(guard)
    }

    /// Borrow the open transaction out of a guard returned by [`Self::transaction`]
    pub fn active<'a>(
        guard: &'a MutexGuard<'_, Option<DatabaseTransaction>>,
    ) -> AppResult<&'a DatabaseTransaction> {
        guard
            .as_ref()
            .ok_or_else(|| AppError::internal("Unit of work transaction is closed"))
    }

    /// Count written rows
    pub fn record(&self, rows: u64) {
        self.changes.fetch_add(rows, Ordering::SeqCst);
    }

    pub async fn commit(&self) -> AppResult<bool> {
        let txn = self.txn.lock().await.take();
        let changes = self.changes.swap(0, Ordering::SeqCst);

        match txn {
            Some(txn) => {
                txn.commit().await?;
                tracing::debug!(rows = changes, "Unit of work committed");
                Ok(changes > 0)
            }
            None => Ok(false),
        }
    }

    pub async fn rollback(&self) -> AppResult<()> {
        let txn = self.txn.lock().await.take();
        self.changes.store(0, Ordering::SeqCst);

        if let Some(txn) = txn {
            txn.rollback().await?;
            tracing::debug!("Unit of work rolled back");
        }
        Ok(())
    }
}

/// SeaORM unit of work
pub struct SeaUnitOfWork {
    session: Arc<DbSession>,
    clientes: Arc<SeaGateway<Cliente>>,
    veiculos: Arc<SeaGateway<Veiculo>>,
    servicos: Arc<SeaGateway<Servico>>,
    estoques: Arc<SeaGateway<Estoque>>,
    ordens_servico: Arc<SeaGateway<OrdemServico>>,
    insumos_os: Arc<SeaGateway<InsumoOs>>,
    usuarios: Arc<SeaGateway<Usuario>>,
    alertas_estoque: Arc<SeaGateway<AlertaEstoque>>,
}

impl SeaUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        let session = Arc::new(DbSession::new(db));
        Self {
            clientes: Arc::new(SeaGateway::new(session.clone())),
            veiculos: Arc::new(SeaGateway::new(session.clone())),
            servicos: Arc::new(SeaGateway::new(session.clone())),
            estoques: Arc::new(SeaGateway::new(session.clone())),
            ordens_servico: Arc::new(SeaGateway::new(session.clone())),
            insumos_os: Arc::new(SeaGateway::new(session.clone())),
            usuarios: Arc::new(SeaGateway::new(session.clone())),
            alertas_estoque: Arc::new(SeaGateway::new(session.clone())),
            session,
        }
    }
}

#[async_trait]
impl UnitOfWork for SeaUnitOfWork {
    fn clientes(&self) -> Arc<dyn Gateway<Cliente>> {
        self.clientes.clone()
    }

    fn veiculos(&self) -> Arc<dyn Gateway<Veiculo>> {
        self.veiculos.clone()
    }

    fn servicos(&self) -> Arc<dyn Gateway<Servico>> {
        self.servicos.clone()
    }

    fn estoques(&self) -> Arc<dyn Gateway<Estoque>> {
        self.estoques.clone()
    }

    fn ordens_servico(&self) -> Arc<dyn Gateway<OrdemServico>> {
        self.ordens_servico.clone()
    }

    fn insumos_os(&self) -> Arc<dyn Gateway<InsumoOs>> {
        self.insumos_os.clone()
    }

    fn usuarios(&self) -> Arc<dyn Gateway<Usuario>> {
        self.usuarios.clone()
    }

    fn alertas_estoque(&self) -> Arc<dyn Gateway<AlertaEstoque>> {
        self.alertas_estoque.clone()
    }

    async fn commit(&self) -> AppResult<bool> {
        self.session.commit().await
    }

    async fn rollback(&self) -> AppResult<()> {
        self.session.rollback().await
    }
}

/// Database-backed [`UnitOfWorkFactory`]
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UnitOfWorkFactory for Persistence {
    fn begin(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(SeaUnitOfWork::new(self.db.clone()))
    }
}
