//! SeaORM-backed gateway.
//!
//! One generic [`SeaGateway`] serves every entity. What differs per entity
//! (table, row mapping, related data) lives in its [`Persisted`] impl next
//! to the SeaORM model.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use super::base::Gateway;
use crate::domain::DomainEntity;
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::DbSession;
use crate::specifications::Specification;
use crate::types::PaginationParams;

/// Columns every table carries
#[derive(Debug, Clone, Copy)]
pub struct BaseColumns<C> {
    pub id: C,
    pub data_cadastro: C,
    pub data_atualizacao: C,
    pub ativo: C,
}

/// Mapping between a domain entity and its SeaORM table
#[async_trait]
pub trait Persisted: DomainEntity {
    type Db: EntityTrait<Model = Self::Model, ActiveModel = Self::Active>;
    type Model: ModelTrait<Entity = Self::Db>
        + FromQueryResult
        + IntoActiveModel<Self::Active>
        + Send
        + Sync
        + 'static;
    type Active: ActiveModelTrait<Entity = Self::Db> + ActiveModelBehavior + Send + Sync + 'static;

    fn columns() -> BaseColumns<<Self::Db as EntityTrait>::Column>;

    fn from_model(model: Self::Model) -> AppResult<Self>;

    /// Every column set, ready for insert or full update
    fn into_active(&self) -> Self::Active;

    /// Fill related data for `rows`
    async fn load_includes<C>(
        conn: &C,
        rows: &mut [Self],
        includes: &[Self::Include],
    ) -> AppResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        let _ = (conn, rows, includes);
        Ok(())
    }
}

/// Convert a list of models, failing on the first bad row
pub(crate) fn from_models<T: Persisted>(models: Vec<T::Model>) -> AppResult<Vec<T>> {
    models.into_iter().map(T::from_model).collect()
}

/// Fetch rows by primary key, keyed by id. Used to fill includes.
pub(crate) async fn load_by_ids<T, C>(conn: &C, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, T>>
where
    T: Persisted,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = T::Db::find()
        .filter(T::columns().id.is_in(ids))
        .all(conn)
        .await?;
    Ok(from_models::<T>(models)?
        .into_iter()
        .map(|entity| (entity.id(), entity))
        .collect())
}

/// Gateway over one SeaORM entity, bound to a unit-of-work session
pub struct SeaGateway<T> {
    session: Arc<DbSession>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Persisted> SeaGateway<T> {
    pub fn new(session: Arc<DbSession>) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Filtered, ordered and paged query. Includes are loaded afterwards.
    fn select(spec: &Specification<T>) -> Select<T::Db> {
        let columns = T::columns();
        let mut query = T::Db::find()
            .filter(spec.condition())
            .order_by_asc(columns.data_cadastro)
            .order_by_asc(columns.id);

        if let Some(paging) = spec.paging() {
            query = query.offset(paging.offset()).limit(paging.limit());
        }
        query
    }

    async fn fetch<C>(conn: &C, spec: &Specification<T>, lock: bool) -> AppResult<Vec<T>>
    where
        C: ConnectionTrait + Sync,
    {
        let mut query = Self::select(spec);
        if lock {
            query = query.lock_exclusive();
        }

        let mut rows = from_models::<T>(query.all(conn).await?)?;
        if !spec.includes().is_empty() {
            T::load_includes(conn, &mut rows, spec.includes()).await?;
        }
        Ok(rows)
    }

    async fn fetch_tracked(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        Self::fetch(txn, spec, true).await
    }

    async fn fetch_untracked(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        Self::fetch(self.session.connection(), spec, false).await
    }

    /// At most one row unless the caller asked for a page
    fn single(spec: &Specification<T>) -> Specification<T> {
        match spec.paging() {
            Some(_) => spec.clone(),
            None => spec.clone().paged(PaginationParams::new(1, 1)),
        }
    }

    fn expect_rows(affected: u64, id: Uuid) -> AppResult<()> {
        if affected == 0 {
            return Err(AppError::not_found(format!("{} {}", T::NAME, id)));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Persisted> Gateway<T> for SeaGateway<T> {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        let model = T::Db::find()
            .filter(T::columns().id.eq(id))
            .one(self.session.connection())
            .await?;
        model.map(T::from_model).transpose()
    }

    async fn get_all(&self) -> AppResult<Vec<T>> {
        self.fetch_untracked(&Specification::all()).await
    }

    async fn create(&self, entity: &T) -> AppResult<()> {
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        T::Db::insert(entity.into_active())
            .exec_without_returning(txn)
            .await?;
        self.session.record(1);
        Ok(())
    }

    async fn create_many(&self, entities: &[T]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        let inserted = T::Db::insert_many(entities.iter().map(T::into_active))
            .exec_without_returning(txn)
            .await?;
        self.session.record(inserted);
        Ok(())
    }

    async fn update(&self, entity: &T) -> AppResult<()> {
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        let result = T::Db::update_many()
            .set(entity.into_active())
            .filter(T::columns().id.eq(entity.id()))
            .exec(txn)
            .await?;
        Self::expect_rows(result.rows_affected, entity.id())?;
        self.session.record(result.rows_affected);
        Ok(())
    }

    async fn update_many(&self, entities: &[T]) -> AppResult<()> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        let result = T::Db::delete_many()
            .filter(T::columns().id.eq(id))
            .exec(txn)
            .await?;
        Self::expect_rows(result.rows_affected, id)?;
        self.session.record(result.rows_affected);
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        let result = T::Db::delete_many()
            .filter(T::columns().id.is_in(ids.iter().copied()))
            .exec(txn)
            .await?;
        self.session.record(result.rows_affected);
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let columns = T::columns();
        let guard = self.session.transaction().await?;
        let txn = DbSession::active(&guard)?;
        let result = T::Db::update_many()
            .col_expr(columns.ativo, Expr::value(false))
            .col_expr(columns.data_atualizacao, Expr::value(Utc::now()))
            .filter(columns.id.eq(id))
            .exec(txn)
            .await?;
        Self::expect_rows(result.rows_affected, id)?;
        self.session.record(result.rows_affected);
        Ok(())
    }

    async fn get_one(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        let rows = self.fetch_tracked(&Self::single(spec)).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_one_untracked(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        let rows = self.fetch_untracked(&Self::single(spec)).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        self.fetch_tracked(spec).await
    }

    async fn list_untracked(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        self.fetch_untracked(spec).await
    }

    async fn count(&self, spec: &Specification<T>) -> AppResult<u64> {
        let total = T::Db::find()
            .filter(spec.condition())
            .count(self.session.connection())
            .await?;
        Ok(total)
    }
}
