//! Generic gateway contract shared by every entity and store.
//!
//! Reads come in two flavours. Tracked reads (`get_one`, `list`) run inside
//! the unit of work's transaction and lock the returned rows until commit.
//! Untracked reads (`*_untracked`, `get_by_id`, `get_all`, `count`) use a
//! plain connection and register nothing.
//!
//! Writes are staged in the unit of work and become visible to other
//! units of work only after [`UnitOfWork::commit`](crate::infra::UnitOfWork::commit).

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainEntity;
use crate::errors::AppResult;
use crate::specifications::{Projection, QueryEvaluator, Specification};

/// CRUD and specification queries over one entity type
#[async_trait]
pub trait Gateway<T: DomainEntity>: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>>;

    async fn get_all(&self) -> AppResult<Vec<T>>;

    async fn create(&self, entity: &T) -> AppResult<()>;

    async fn create_many(&self, entities: &[T]) -> AppResult<()>;

    /// `DataNotFound` when the row does not exist
    async fn update(&self, entity: &T) -> AppResult<()>;

    async fn update_many(&self, entities: &[T]) -> AppResult<()>;

    /// Hard delete. `DataNotFound` when the row does not exist
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<()>;

    /// Flip the `ativo` flag. `DataNotFound` when the row does not exist
    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    async fn get_one(&self, spec: &Specification<T>) -> AppResult<Option<T>>;

    async fn get_one_untracked(&self, spec: &Specification<T>) -> AppResult<Option<T>>;

    async fn list(&self, spec: &Specification<T>) -> AppResult<Vec<T>>;

    async fn list_untracked(&self, spec: &Specification<T>) -> AppResult<Vec<T>>;

    /// Rows matching the filter, paging ignored
    async fn count(&self, spec: &Specification<T>) -> AppResult<u64>;
}

/// Projected reads, available on every gateway
#[async_trait]
pub trait GatewayExt<T: DomainEntity>: Gateway<T> {
    async fn get_one_projected<P: Send + 'static>(
        &self,
        projection: &Projection<T, P>,
    ) -> AppResult<Option<P>> {
        let found = self.get_one(projection.specification()).await?;
        Ok(QueryEvaluator::project(found, projection).pop())
    }

    async fn get_one_projected_untracked<P: Send + 'static>(
        &self,
        projection: &Projection<T, P>,
    ) -> AppResult<Option<P>> {
        let found = self.get_one_untracked(projection.specification()).await?;
        Ok(QueryEvaluator::project(found, projection).pop())
    }

    async fn list_projected<P: Send + 'static>(
        &self,
        projection: &Projection<T, P>,
    ) -> AppResult<Vec<P>> {
        let rows = self.list(projection.specification()).await?;
        Ok(QueryEvaluator::project(rows, projection))
    }

    async fn list_projected_untracked<P: Send + 'static>(
        &self,
        projection: &Projection<T, P>,
    ) -> AppResult<Vec<P>> {
        let rows = self.list_untracked(projection.specification()).await?;
        Ok(QueryEvaluator::project(rows, projection))
    }
}

impl<T: DomainEntity, G: Gateway<T> + ?Sized> GatewayExt<T> for G {}
