//! Estoque filters.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::Specification;
use crate::domain::Estoque;
use crate::infra::repositories::entities::estoque::Column;

/// Available quantity at or below the minimum
pub fn critico() -> Specification<Estoque> {
    Specification::new(
        Condition::all().add(
            Expr::col(Column::QuantidadeDisponivel).lte(Expr::col(Column::QuantidadeMinima)),
        ),
        Estoque::is_critico,
    )
}

pub fn por_insumo(insumo: &str) -> Specification<Estoque> {
    let insumo = insumo.trim().to_string();
    Specification::new(
        Condition::all().add(Column::Insumo.eq(insumo.clone())),
        move |estoque: &Estoque| estoque.insumo == insumo,
    )
}

pub fn por_ids(ids: Vec<Uuid>) -> Specification<Estoque> {
    Specification::new(
        Condition::all().add(Column::Id.is_in(ids.clone())),
        move |estoque: &Estoque| ids.contains(&estoque.base.id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CadastrarEstoque;
    use rust_decimal::Decimal;

    fn estoque(disponivel: i32, minima: i32) -> Estoque {
        Estoque::new(CadastrarEstoque {
            insumo: "Correia dentada".to_string(),
            descricao: String::new(),
            preco: Decimal::new(18990, 2),
            quantidade_disponivel: disponivel,
            quantidade_minima: minima,
        })
    }

    #[test]
    fn test_critico_boundary() {
        let spec = critico();
        assert!(spec.is_satisfied_by(&estoque(5, 5)));
        assert!(!spec.is_satisfied_by(&estoque(6, 5)));
        assert!(spec.is_satisfied_by(&estoque(0, 5)));
    }

    #[test]
    fn test_por_ids() {
        let a = estoque(1, 0);
        let b = estoque(1, 0);
        let spec = por_ids(vec![a.base.id]);
        assert!(spec.is_satisfied_by(&a));
        assert!(!spec.is_satisfied_by(&b));
    }

    #[test]
    fn test_critico_and_insumo_compose() {
        let spec = critico() & por_insumo("Correia dentada");
        assert!(spec.is_satisfied_by(&estoque(1, 2)));
        assert!(!spec.is_satisfied_by(&estoque(3, 2)));
    }
}
