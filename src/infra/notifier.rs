//! Critical-stock alert delivery.

use async_trait::async_trait;

use crate::domain::{Estoque, Usuario};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delivers a critical-stock alert to the users subscribed to it
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AlertaNotifier: Send + Sync {
    async fn notificar(&self, estoque: &Estoque, destinatarios: &[Usuario]) -> AppResult<()>;
}

/// Writes the alert to the log instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl AlertaNotifier for LogNotifier {
    async fn notificar(&self, estoque: &Estoque, destinatarios: &[Usuario]) -> AppResult<()> {
        if destinatarios.is_empty() {
            tracing::warn!(insumo = %estoque.insumo, "No user subscribed to stock alerts");
            return Ok(());
        }

        for usuario in destinatarios {
            tracing::info!(
                to = %usuario.email,
                insumo = %estoque.insumo,
                disponivel = estoque.quantidade_disponivel,
                minimo = estoque.quantidade_minima,
                "Critical stock alert (not sent)"
            );
        }
        Ok(())
    }
}
