//! Applies a specification to rows already in memory.
//!
//! Order of application: includes, predicate, paging, then projection for
//! projected reads. The SeaORM gateway follows the same contract but pushes
//! the filter and the page into SQL and loads includes for the returned page
//! only, which gives the same result because predicates never look at
//! related data.

use super::{Projection, Specification};
use crate::domain::DomainEntity;
use crate::types::PaginationParams;

pub struct QueryEvaluator;

impl QueryEvaluator {
    /// Filter and page `rows`. `resolve` loads one include into an entity.
    pub fn evaluate<T, R>(
        rows: impl IntoIterator<Item = T>,
        spec: &Specification<T>,
        mut resolve: R,
    ) -> Vec<T>
    where
        T: DomainEntity,
        R: FnMut(&mut T, T::Include),
    {
        let matched = rows
            .into_iter()
            .map(|mut row| {
                for include in spec.includes() {
                    resolve(&mut row, *include);
                }
                row
            })
            .filter(|row| spec.is_satisfied_by(row));

        Self::page(matched, spec.paging())
    }

    /// Map rows already filtered and paged for `projection`. The map is one
    /// row to one value, so projecting after paging matches projecting first.
    pub fn project<T, P>(rows: impl IntoIterator<Item = T>, projection: &Projection<T, P>) -> Vec<P>
    where
        T: DomainEntity,
    {
        rows.into_iter().map(|row| projection.project(row)).collect()
    }

    /// Number of rows matching the filter, ignoring paging
    pub fn count<'a, T: DomainEntity>(
        rows: impl IntoIterator<Item = &'a T>,
        spec: &Specification<T>,
    ) -> u64 {
        rows.into_iter()
            .filter(|row| spec.is_satisfied_by(row))
            .count() as u64
    }

    fn page<X>(items: impl Iterator<Item = X>, paging: Option<PaginationParams>) -> Vec<X> {
        match paging {
            Some(paging) => items
                .skip(usize::try_from(paging.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(paging.limit()).unwrap_or(usize::MAX))
                .collect(),
            None => items.collect(),
        }
    }
}
