//! OrdemServico filters.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::Specification;
use crate::domain::{OrdemServico, OrdemServicoInclude, StatusOrdemServico};
use crate::infra::repositories::entities::ordem_servico::Column;

/// Pending orders whose budget was sent at or before `agora - validade`
pub fn orcamento_expirado(agora: DateTime<Utc>, validade: Duration) -> Specification<OrdemServico> {
    let limite = agora - validade;
    let pendentes = StatusOrdemServico::EXPIRAVEIS.map(|status| status.as_str());

    Specification::new(
        Condition::all()
            .add(Column::DataEnvioOrcamento.is_not_null())
            .add(Column::DataEnvioOrcamento.lte(limite))
            .add(Column::Status.is_in(pendentes)),
        move |ordem: &OrdemServico| ordem.orcamento_expirado(agora, validade),
    )
}

pub fn por_status(status: StatusOrdemServico) -> Specification<OrdemServico> {
    Specification::new(
        Condition::all().add(Column::Status.eq(status.as_str())),
        move |ordem: &OrdemServico| ordem.status == status,
    )
}

/// Order by id with every related record loaded
pub fn detalhada(id: Uuid) -> Specification<OrdemServico> {
    Specification::por_id(id).with_includes(OrdemServicoInclude::TODOS)
}
