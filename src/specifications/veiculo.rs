//! Veiculo filters.

use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::Specification;
use crate::domain::{normalizar_placa, Veiculo};
use crate::infra::repositories::entities::veiculo::Column;

pub fn por_placa(placa: &str) -> Specification<Veiculo> {
    let placa = normalizar_placa(placa);
    Specification::new(
        Condition::all().add(Column::Placa.eq(placa.clone())),
        move |veiculo: &Veiculo| veiculo.placa == placa,
    )
}

pub fn por_cliente(cliente_id: Uuid) -> Specification<Veiculo> {
    Specification::new(
        Condition::all().add(Column::ClienteId.eq(cliente_id)),
        move |veiculo: &Veiculo| veiculo.cliente_id == cliente_id,
    )
}
