//! Budget expiry: orders whose budget went unanswered past its validity are
//! moved to `OrcamentoExpirado` and their reserved stock is returned.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::domain::{OrdemServico, OrdemServicoInclude};
use crate::errors::AppResult;
use crate::infra::UnitOfWorkFactory;
use crate::services::devolver_insumos;
use crate::specifications::ordem_servico::orcamento_expirado;

pub struct OrcamentoExpiradoJob {
    persistence: Arc<dyn UnitOfWorkFactory>,
    validade: Duration,
}

impl OrcamentoExpiradoJob {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>, validade: Duration) -> Self {
        Self {
            persistence,
            validade,
        }
    }

    /// Expire every pending budget sent at or before `agora - validade`.
    /// Returns the number of orders expired.
    pub async fn executar(&self, agora: DateTime<Utc>) -> AppResult<usize> {
        tracing::info!(validade_dias = self.validade.num_days(), "Budget expiry run started");

        let uow = self.persistence.begin();
        let mut ordens: Vec<OrdemServico> = uow
            .ordens_servico()
            .list(&orcamento_expirado(agora, self.validade).with_include(OrdemServicoInclude::Insumos))
            .await?;

        if ordens.is_empty() {
            tracing::info!("No expired budget found");
            return Ok(0);
        }

        for ordem in &mut ordens {
            ordem.expirar_orcamento()?;
        }

        let estoques = devolver_insumos(uow.as_ref(), ordens.iter().flat_map(|o| &o.insumos)).await?;
        uow.ordens_servico().update_many(&ordens).await?;

        if let Err(e) = uow.commit().await {
            tracing::error!(error = %e, "Budget expiry commit failed");
            return Err(e);
        }

        tracing::info!(
            ordens = ordens.len(),
            estoques,
            "Budget expiry run finished"
        );
        Ok(ordens.len())
    }
}
