//! Usuario filters.

use sea_orm::{ColumnTrait, Condition};

use super::Specification;
use crate::domain::usuario::normalizar_email;
use crate::domain::Usuario;
use crate::infra::repositories::entities::usuario::Column;

pub fn por_email(email: &str) -> Specification<Usuario> {
    let email = normalizar_email(email);
    Specification::new(
        Condition::all().add(Column::Email.eq(email.clone())),
        move |usuario: &Usuario| usuario.email == email,
    )
}

/// Active users subscribed to critical stock alerts
pub fn recebem_alerta_estoque() -> Specification<Usuario> {
    Specification::new(
        Condition::all()
            .add(Column::RecebeAlertaEstoque.eq(true))
            .add(Column::Ativo.eq(true)),
        |usuario: &Usuario| usuario.recebe_alerta_estoque && usuario.base.ativo,
    )
}
