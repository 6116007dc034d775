//! Composable query filters.
//!
//! A [`Specification`] carries a filter, the related data to load and an
//! optional page. The filter exists twice: as an in-memory predicate and as a
//! SeaORM [`Condition`]. Both are built together by [`Specification::new`]
//! so a gateway can pick whichever rendition its store understands.
//!
//! Composition rules:
//! - `a & b` matches when both match, `a | b` when either matches.
//! - A specification without filter matches everything, so it is the
//!   identity for AND and absorbs OR.
//! - Include lists are merged (union, left order first).
//! - Paging is taken from the left side, falling back to the right one.

pub mod alerta_estoque;
pub mod cliente;
pub mod estoque;
mod evaluator;
pub mod ordem_servico;
pub mod servico;
pub mod usuario;
pub mod veiculo;

pub use evaluator::QueryEvaluator;

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

use sea_orm::sea_query::{Alias, Expr};
use sea_orm::Condition;
use uuid::Uuid;

use crate::domain::DomainEntity;
use crate::types::PaginationParams;

/// In-memory rendition of a filter
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

struct Filter<T> {
    predicate: Predicate<T>,
    condition: Condition,
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            condition: self.condition.clone(),
        }
    }
}

/// Query filter over `T` plus eager-load hints and paging
pub struct Specification<T: DomainEntity> {
    filter: Option<Filter<T>>,
    includes: Vec<T::Include>,
    paging: Option<PaginationParams>,
}

impl<T: DomainEntity> Specification<T> {
    /// Filter given as a SQL condition and the equivalent predicate
    pub fn new<F>(condition: Condition, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Some(Filter {
                predicate: Arc::new(predicate),
                condition,
            }),
            includes: Vec::new(),
            paging: None,
        }
    }

    /// Matches every entity
    pub fn all() -> Self {
        Self {
            filter: None,
            includes: Vec::new(),
            paging: None,
        }
    }

    /// Entity with the given id. Every table keys on an `id` column.
    pub fn por_id(id: Uuid) -> Self {
        Self::new(
            Condition::all().add(Expr::col(Alias::new("id")).eq(id)),
            move |entity: &T| entity.id() == id,
        )
    }

    /// Entities not soft-deleted
    pub fn ativos() -> Self {
        Self::new(
            Condition::all().add(Expr::col(Alias::new("ativo")).eq(true)),
            |entity: &T| entity.is_active(),
        )
    }

    pub fn with_include(mut self, include: T::Include) -> Self {
        if !self.includes.contains(&include) {
            self.includes.push(include);
        }
        self
    }

    pub fn with_includes(self, includes: impl IntoIterator<Item = T::Include>) -> Self {
        includes.into_iter().fold(self, Self::with_include)
    }

    pub fn paged(mut self, paging: PaginationParams) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Same filter and includes, no paging (used for totals)
    pub fn unpaged(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            includes: self.includes.clone(),
            paging: None,
        }
    }

    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| (filter.predicate)(entity))
    }

    /// SQL rendition of the filter (`Condition::all()` when unfiltered)
    pub fn condition(&self) -> Condition {
        self.filter
            .as_ref()
            .map_or_else(Condition::all, |filter| filter.condition.clone())
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn includes(&self) -> &[T::Include] {
        &self.includes
    }

    pub fn paging(&self) -> Option<PaginationParams> {
        self.paging
    }

    pub fn and(self, other: Self) -> Self {
        let filter = match (self.filter, other.filter) {
            (Some(left), Some(right)) => Some(Filter {
                condition: Condition::all()
                    .add(left.condition)
                    .add(right.condition),
                predicate: Arc::new(move |entity: &T| {
                    (left.predicate)(entity) && (right.predicate)(entity)
                }),
            }),
            (left, right) => left.or(right),
        };

        Self {
            filter,
            includes: merge(self.includes, other.includes),
            paging: self.paging.or(other.paging),
        }
    }

    pub fn or(self, other: Self) -> Self {
        let filter = match (self.filter, other.filter) {
            (Some(left), Some(right)) => Some(Filter {
                condition: Condition::any()
                    .add(left.condition)
                    .add(right.condition),
                predicate: Arc::new(move |entity: &T| {
                    (left.predicate)(entity) || (right.predicate)(entity)
                }),
            }),
            _ => None,
        };

        Self {
            filter,
            includes: merge(self.includes, other.includes),
            paging: self.paging.or(other.paging),
        }
    }

    /// Turn into a projection producing `P` from each match
    pub fn select<P, F>(self, map: F) -> Projection<T, P>
    where
        F: Fn(T) -> P + Send + Sync + 'static,
    {
        Projection::new(self, map)
    }
}

fn merge<I: PartialEq>(mut left: Vec<I>, right: Vec<I>) -> Vec<I> {
    for include in right {
        if !left.contains(&include) {
            left.push(include);
        }
    }
    left
}

impl<T: DomainEntity> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            includes: self.includes.clone(),
            paging: self.paging,
        }
    }
}

impl<T: DomainEntity> Default for Specification<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T: DomainEntity> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("entity", &T::NAME)
            .field("condition", &self.filter.as_ref().map(|filter| &filter.condition))
            .field("includes", &self.includes)
            .field("paging", &self.paging)
            .finish()
    }
}

impl<T: DomainEntity> BitAnd for Specification<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<T: DomainEntity> BitOr for Specification<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

/// A specification whose matches are mapped to another shape
pub struct Projection<T: DomainEntity, P> {
    specification: Specification<T>,
    map: Arc<dyn Fn(T) -> P + Send + Sync>,
}

impl<T: DomainEntity, P> Projection<T, P> {
    pub fn new<F>(specification: Specification<T>, map: F) -> Self
    where
        F: Fn(T) -> P + Send + Sync + 'static,
    {
        Self {
            specification,
            map: Arc::new(map),
        }
    }

    pub fn specification(&self) -> &Specification<T> {
        &self.specification
    }

    pub fn project(&self, entity: T) -> P {
        (self.map)(entity)
    }
}

impl<T: DomainEntity, P> Clone for Projection<T, P> {
    fn clone(&self) -> Self {
        Self {
            specification: self.specification.clone(),
            map: Arc::clone(&self.map),
        }
    }
}

impl<T: DomainEntity, P> fmt::Debug for Projection<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("specification", &self.specification)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CadastrarEstoque, Estoque};
    use rust_decimal::Decimal;

    fn estoque(disponivel: i32, minima: i32) -> Estoque {
        Estoque::new(CadastrarEstoque {
            insumo: format!("Item {}", disponivel),
            descricao: String::new(),
            preco: Decimal::ONE,
            quantidade_disponivel: disponivel,
            quantidade_minima: minima,
        })
    }

    fn acima_de(n: i32) -> Specification<Estoque> {
        Specification::new(
            Condition::all().add(Expr::col(Alias::new("quantidade_disponivel")).gt(n)),
            move |e: &Estoque| e.quantidade_disponivel > n,
        )
    }

    fn abaixo_de(n: i32) -> Specification<Estoque> {
        Specification::new(
            Condition::all().add(Expr::col(Alias::new("quantidade_disponivel")).lt(n)),
            move |e: &Estoque| e.quantidade_disponivel < n,
        )
    }

    #[test]
    fn test_and_or_laws() {
        let amostras: Vec<Estoque> = (0..12).map(|q| estoque(q, 0)).collect();
        let casos = [(2, 8), (5, 5), (9, 3), (0, 12)];

        for (a, b) in casos {
            let and = acima_de(a) & abaixo_de(b);
            let or = acima_de(a) | abaixo_de(b);
            for x in &amostras {
                let l = acima_de(a).is_satisfied_by(x);
                let r = abaixo_de(b).is_satisfied_by(x);
                assert_eq!(and.is_satisfied_by(x), l && r);
                assert_eq!(or.is_satisfied_by(x), l || r);
            }
        }
    }

    #[test]
    fn test_unfiltered_matches_everything() {
        let spec = Specification::<Estoque>::all();
        assert!(!spec.has_filter());
        assert!(spec.is_satisfied_by(&estoque(0, 10)));
        assert!(spec.is_satisfied_by(&estoque(100, 0)));
    }

    #[test]
    fn test_unfiltered_is_and_identity_and_or_absorbing() {
        let x = estoque(1, 0);
        let and = Specification::all() & acima_de(5);
        assert!(and.has_filter());
        assert!(!and.is_satisfied_by(&x));

        let or = acima_de(5) | Specification::all();
        assert!(!or.has_filter());
        assert!(or.is_satisfied_by(&x));
    }

    #[test]
    fn test_paging_prefers_left_then_right() {
        let left = PaginationParams::new(2, 10);
        let right = PaginationParams::new(1, 50);

        let both = acima_de(1).paged(left) & abaixo_de(9).paged(right);
        assert_eq!(both.paging(), Some(left));

        let only_right = acima_de(1) | abaixo_de(9).paged(right);
        assert_eq!(only_right.paging(), Some(right));
    }

    #[test]
    fn test_unpaged_keeps_filter() {
        let spec = acima_de(3).paged(PaginationParams::new(1, 5));
        let total = spec.unpaged();
        assert!(total.paging().is_none());
        assert!(!total.is_satisfied_by(&estoque(2, 0)));
    }

    #[test]
    fn test_projection_maps_matches() {
        let projection = acima_de(0).select(|e: Estoque| e.insumo);
        assert_eq!(projection.project(estoque(4, 0)), "Item 4");
        assert!(projection.specification().has_filter());
    }
}
