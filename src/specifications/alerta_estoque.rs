//! AlertaEstoque filters.

use chrono::{Duration, NaiveDate};
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::Specification;
use crate::domain::AlertaEstoque;
use crate::infra::repositories::entities::alerta_estoque::Column;

/// Alert for `estoque_id` registered on `dia` (UTC calendar day)
pub fn enviado_em(estoque_id: Uuid, dia: NaiveDate) -> Specification<AlertaEstoque> {
    let inicio = dia.and_time(chrono::NaiveTime::MIN).and_utc();
    let fim = inicio + Duration::days(1);

    Specification::new(
        Condition::all()
            .add(Column::EstoqueId.eq(estoque_id))
            .add(Column::DataCadastro.gte(inicio))
            .add(Column::DataCadastro.lt(fim)),
        move |alerta: &AlertaEstoque| {
            alerta.estoque_id == estoque_id
                && alerta.base.data_cadastro >= inicio
                && alerta.base.data_cadastro < fim
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enviado_em_same_day_only() {
        let alerta = AlertaEstoque::new(Uuid::new_v4());
        let hoje = alerta.base.data_cadastro.date_naive();

        assert!(enviado_em(alerta.estoque_id, hoje).is_satisfied_by(&alerta));
        assert!(!enviado_em(alerta.estoque_id, hoje - Duration::days(1)).is_satisfied_by(&alerta));
        assert!(!enviado_em(Uuid::new_v4(), hoje).is_satisfied_by(&alerta));
    }
}
