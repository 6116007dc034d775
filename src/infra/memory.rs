//! In-memory store implementing the same gateway and unit-of-work contracts
//! as the SeaORM one. Used by tests and local tooling.
//!
//! Writes are staged per unit of work and applied together on `commit`.
//! Reads see committed rows only. Tracked and untracked reads behave the
//! same since there is no row locking.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::repositories::Gateway;
use super::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::{
    AlertaEstoque, Cliente, ClienteInclude, DomainEntity, Estoque, InsumoOs, InsumoOsInclude,
    OrdemServico, OrdemServicoInclude, Servico, Usuario, Veiculo, VeiculoInclude,
};
use crate::errors::{AppError, AppResult};
use crate::specifications::{QueryEvaluator, Specification};

type Table<T> = RwLock<HashMap<Uuid, T>>;

fn read<T>(table: &Table<T>) -> RwLockReadGuard<'_, HashMap<Uuid, T>> {
    table.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(table: &Table<T>) -> RwLockWriteGuard<'_, HashMap<Uuid, T>> {
    table.write().unwrap_or_else(PoisonError::into_inner)
}

/// Committed rows of every table
#[derive(Default)]
pub struct MemoryDatabase {
    clientes: Table<Cliente>,
    veiculos: Table<Veiculo>,
    servicos: Table<Servico>,
    estoques: Table<Estoque>,
    ordens_servico: Table<OrdemServico>,
    insumos_os: Table<InsumoOs>,
    usuarios: Table<Usuario>,
    alertas_estoque: Table<AlertaEstoque>,
    commits: AtomicU64,
}

impl MemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Commits that wrote at least one change
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Committed row of `T` by id
    pub fn find<T: MemoryEntity>(&self, id: Uuid) -> Option<T> {
        read(T::table(self)).get(&id).cloned()
    }

    fn rows<T: MemoryEntity>(&self) -> Vec<T> {
        let mut rows: Vec<T> = read(T::table(self)).values().cloned().collect();
        rows.sort_by_key(|row| (row.base().data_cadastro, row.id()));
        rows
    }
}

/// Entity stored in a [`MemoryDatabase`] table
pub trait MemoryEntity: DomainEntity {
    fn table(db: &MemoryDatabase) -> &Table<Self>;

    /// Load one include from the committed rows of `db`
    fn resolve(db: &MemoryDatabase, entity: &mut Self, include: Self::Include);

    /// Drop loaded related data before the row is stored
    fn strip(_entity: &mut Self) {}
}

macro_rules! memory_entity_without_includes {
    ($($entity:ty => $table:ident),* $(,)?) => {
        $(
            impl MemoryEntity for $entity {
                fn table(db: &MemoryDatabase) -> &Table<Self> {
                    &db.$table
                }

                fn resolve(_: &MemoryDatabase, _: &mut Self, include: Self::Include) {
                    match include {}
                }
            }
        )*
    };
}

memory_entity_without_includes!(
    Servico => servicos,
    Estoque => estoques,
    Usuario => usuarios,
    AlertaEstoque => alertas_estoque,
);

impl MemoryEntity for Cliente {
    fn table(db: &MemoryDatabase) -> &Table<Self> {
        &db.clientes
    }

    fn resolve(db: &MemoryDatabase, cliente: &mut Self, include: ClienteInclude) {
        match include {
            ClienteInclude::Veiculos => {
                cliente.veiculos = db
                    .rows::<Veiculo>()
                    .into_iter()
                    .filter(|veiculo| veiculo.cliente_id == cliente.base.id)
                    .collect();
            }
        }
    }

    fn strip(cliente: &mut Self) {
        cliente.veiculos.clear();
    }
}

impl MemoryEntity for Veiculo {
    fn table(db: &MemoryDatabase) -> &Table<Self> {
        &db.veiculos
    }

    fn resolve(db: &MemoryDatabase, veiculo: &mut Self, include: VeiculoInclude) {
        match include {
            VeiculoInclude::Cliente => veiculo.cliente = db.find(veiculo.cliente_id),
        }
    }

    fn strip(veiculo: &mut Self) {
        veiculo.cliente = None;
    }
}

impl MemoryEntity for InsumoOs {
    fn table(db: &MemoryDatabase) -> &Table<Self> {
        &db.insumos_os
    }

    fn resolve(db: &MemoryDatabase, insumo: &mut Self, include: InsumoOsInclude) {
        match include {
            InsumoOsInclude::Estoque => insumo.estoque = db.find(insumo.estoque_id),
        }
    }

    fn strip(insumo: &mut Self) {
        insumo.estoque = None;
    }
}

impl MemoryEntity for OrdemServico {
    fn table(db: &MemoryDatabase) -> &Table<Self> {
        &db.ordens_servico
    }

    fn resolve(db: &MemoryDatabase, ordem: &mut Self, include: OrdemServicoInclude) {
        match include {
            OrdemServicoInclude::Cliente => ordem.cliente = db.find(ordem.cliente_id),
            OrdemServicoInclude::Veiculo => ordem.veiculo = db.find(ordem.veiculo_id),
            OrdemServicoInclude::Servico => ordem.servico = db.find(ordem.servico_id),
            OrdemServicoInclude::Insumos => {
                ordem.insumos = db
                    .rows::<InsumoOs>()
                    .into_iter()
                    .filter(|insumo| insumo.ordem_servico_id == ordem.base.id)
                    .map(|mut insumo| {
                        InsumoOs::resolve(db, &mut insumo, InsumoOsInclude::Estoque);
                        insumo
                    })
                    .collect();
            }
        }
    }

    fn strip(ordem: &mut Self) {
        ordem.cliente = None;
        ordem.veiculo = None;
        ordem.servico = None;
        ordem.insumos.clear();
    }
}

type StagedChange = Box<dyn FnOnce(&MemoryDatabase) + Send>;

/// Changes waiting for commit, shared by the gateways of one unit of work
#[derive(Default)]
struct Staging {
    changes: Mutex<Vec<StagedChange>>,
}

impl Staging {
    fn push(&self, change: StagedChange) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change);
    }

    fn take(&self) -> Vec<StagedChange> {
        std::mem::take(&mut *self.changes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

pub struct MemoryGateway<T> {
    db: Arc<MemoryDatabase>,
    staging: Arc<Staging>,
    /// Ids inserted by this unit of work, not committed yet
    pending: Mutex<HashSet<Uuid>>,
    _entity: std::marker::PhantomData<fn() -> T>,
}

impl<T: MemoryEntity> MemoryGateway<T> {
    fn new(db: Arc<MemoryDatabase>, staging: Arc<Staging>) -> Self {
        Self {
            db,
            staging,
            pending: Mutex::new(HashSet::new()),
            _entity: std::marker::PhantomData,
        }
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, HashSet<Uuid>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_exists(&self, id: Uuid) -> AppResult<()> {
        if read(T::table(&self.db)).contains_key(&id) || self.pending().contains(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(format!("{} {}", T::NAME, id)))
        }
    }

    fn stage_upsert(&self, entity: &T) {
        let mut entity = entity.clone();
        T::strip(&mut entity);
        self.staging.push(Box::new(move |db: &MemoryDatabase| {
            write(T::table(db)).insert(entity.id(), entity);
        }));
    }

    fn evaluate(&self, spec: &Specification<T>) -> Vec<T> {
        let db = &self.db;
        QueryEvaluator::evaluate(db.rows::<T>(), spec, |entity, include| {
            T::resolve(db, entity, include)
        })
    }
}

#[async_trait]
impl<T: MemoryEntity> Gateway<T> for MemoryGateway<T> {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        Ok(self.db.find(id))
    }

    async fn get_all(&self) -> AppResult<Vec<T>> {
        Ok(self.db.rows())
    }

    async fn create(&self, entity: &T) -> AppResult<()> {
        if read(T::table(&self.db)).contains_key(&entity.id()) || !self.pending().insert(entity.id())
        {
            return Err(AppError::already_registered(format!("{} {}", T::NAME, entity.id())));
        }
        self.stage_upsert(entity);
        Ok(())
    }

    async fn create_many(&self, entities: &[T]) -> AppResult<()> {
        for entity in entities {
            self.create(entity).await?;
        }
        Ok(())
    }

    async fn update(&self, entity: &T) -> AppResult<()> {
        self.ensure_exists(entity.id())?;
        self.stage_upsert(entity);
        Ok(())
    }

    async fn update_many(&self, entities: &[T]) -> AppResult<()> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.pending().remove(&id);
        self.staging.push(Box::new(move |db: &MemoryDatabase| {
            write(T::table(db)).remove(&id);
        }));
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<()> {
        let ids = ids.to_vec();
        {
            let mut pending = self.pending();
            for id in &ids {
                pending.remove(id);
            }
        }
        self.staging.push(Box::new(move |db: &MemoryDatabase| {
            let mut table = write(T::table(db));
            for id in &ids {
                table.remove(id);
            }
        }));
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.staging.push(Box::new(move |db: &MemoryDatabase| {
            if let Some(entity) = write(T::table(db)).get_mut(&id) {
                let base = entity.base_mut();
                base.ativo = false;
                base.data_atualizacao = Some(Utc::now());
            }
        }));
        Ok(())
    }

    async fn get_one(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        Ok(self.evaluate(spec).into_iter().next())
    }

    async fn get_one_untracked(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        Ok(self.evaluate(spec).into_iter().next())
    }

    async fn list(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        Ok(self.evaluate(spec))
    }

    async fn list_untracked(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        Ok(self.evaluate(spec))
    }

    async fn count(&self, spec: &Specification<T>) -> AppResult<u64> {
        Ok(QueryEvaluator::count(&self.db.rows::<T>(), spec))
    }
}

pub struct MemoryUnitOfWork {
    db: Arc<MemoryDatabase>,
    staging: Arc<Staging>,
    clientes: Arc<MemoryGateway<Cliente>>,
    veiculos: Arc<MemoryGateway<Veiculo>>,
    servicos: Arc<MemoryGateway<Servico>>,
    estoques: Arc<MemoryGateway<Estoque>>,
    ordens_servico: Arc<MemoryGateway<OrdemServico>>,
    insumos_os: Arc<MemoryGateway<InsumoOs>>,
    usuarios: Arc<MemoryGateway<Usuario>>,
    alertas_estoque: Arc<MemoryGateway<AlertaEstoque>>,
}

impl MemoryUnitOfWork {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        let staging = Arc::new(Staging::default());
        macro_rules! gateway {
            () => {
                Arc::new(MemoryGateway::new(db.clone(), staging.clone()))
            };
        }
        Self {
            clientes: gateway!(),
            veiculos: gateway!(),
            servicos: gateway!(),
            estoques: gateway!(),
            ordens_servico: gateway!(),
            insumos_os: gateway!(),
            usuarios: gateway!(),
            alertas_estoque: gateway!(),
            db,
            staging,
        }
    }

    fn clear_pending(&self) {
        self.clientes.pending().clear();
        self.veiculos.pending().clear();
        self.servicos.pending().clear();
        self.estoques.pending().clear();
        self.ordens_servico.pending().clear();
        self.insumos_os.pending().clear();
        self.usuarios.pending().clear();
        self.alertas_estoque.pending().clear();
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
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
        let changes = self.staging.take();
        self.clear_pending();
        if changes.is_empty() {
            return Ok(false);
        }

        for change in changes {
            change(&self.db);
        }
        self.db.commits.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn rollback(&self) -> AppResult<()> {
        self.staging.take();
        self.clear_pending();
        Ok(())
    }
}

/// [`UnitOfWorkFactory`] over a shared [`MemoryDatabase`]
#[derive(Clone)]
pub struct MemoryPersistence {
    db: Arc<MemoryDatabase>,
}

impl MemoryPersistence {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<MemoryDatabase> {
        &self.db
    }
}

impl UnitOfWorkFactory for MemoryPersistence {
    fn begin(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(MemoryUnitOfWork::new(self.db.clone()))
    }
}
