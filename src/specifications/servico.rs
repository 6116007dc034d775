//! Servico filters.

use sea_orm::{ColumnTrait, Condition};

use super::Specification;
use crate::domain::Servico;
use crate::infra::repositories::entities::servico::Column;

pub fn por_nome(nome: &str) -> Specification<Servico> {
    let nome = nome.trim().to_string();
    Specification::new(
        Condition::all().add(Column::Nome.eq(nome.clone())),
        move |servico: &Servico| servico.nome == nome,
    )
}
