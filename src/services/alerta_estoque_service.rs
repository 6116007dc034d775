//! Critical-stock alerts: daily dedup and delivery.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::traced;
use crate::domain::{AlertaEstoque, AlertaEstoqueResponse, Estoque};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{AlertaNotifier, GatewayExt, UnitOfWork, UnitOfWorkFactory};
use crate::specifications::{alerta_estoque, estoque, usuario, Specification};

/// Outcome of a critical-stock sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerificacaoEstoque {
    /// Active stock items at or below their minimum
    pub criticos: usize,
    /// Alerts registered by this sweep
    pub alertados: usize,
}

#[async_trait]
pub trait AlertaEstoqueService: Send + Sync {
    /// Register today's alert for a stock item.
    ///
    /// `DataAlreadyRegistered` when one was already registered today.
    async fn cadastrar_alerta(&self, estoque_id: Uuid) -> AppResult<AlertaEstoqueResponse>;

    async fn verificar_alerta_enviado_hoje(&self, estoque_id: Uuid) -> AppResult<bool>;

    /// Alert every critical item not alerted today and notify subscribers
    async fn verificar_estoques_criticos(&self) -> AppResult<VerificacaoEstoque>;
}

pub struct AlertaEstoqueManager {
    persistence: Arc<dyn UnitOfWorkFactory>,
    notifier: Arc<dyn AlertaNotifier>,
}

impl AlertaEstoqueManager {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>, notifier: Arc<dyn AlertaNotifier>) -> Self {
        Self {
            persistence,
            notifier,
        }
    }
}

fn hoje() -> NaiveDate {
    Utc::now().date_naive()
}

/// Stage today's alert for `estoque` unless one exists. The caller read
/// `estoque` tracked, so its row lock orders this check, and commits.
pub(crate) async fn registrar_alerta(
    uow: &dyn UnitOfWork,
    estoque: &Estoque,
) -> AppResult<Option<AlertaEstoque>> {
    let enviado = uow
        .alertas_estoque()
        .get_one_untracked(&alerta_estoque::enviado_em(estoque.base.id, hoje()))
        .await?;
    if enviado.is_some() {
        tracing::debug!(estoque_id = %estoque.base.id, "Stock alert already sent today");
        return Ok(None);
    }

    let alerta = AlertaEstoque::new(estoque.base.id);
    uow.alertas_estoque().create(&alerta).await?;
    Ok(Some(alerta))
}

/// Deliver alerts for committed records. Runs after commit, so every
/// failure here is logged and swallowed.
pub(crate) async fn notificar(
    uow: &dyn UnitOfWork,
    notifier: &dyn AlertaNotifier,
    estoques: &[Estoque],
) {
    if estoques.is_empty() {
        return;
    }

    let destinatarios = match uow
        .usuarios()
        .list_untracked(&usuario::recebem_alerta_estoque())
        .await
    {
        Ok(destinatarios) => destinatarios,
        Err(e) => {
            tracing::warn!(
                alertas = estoques.len(),
                error = %e,
                "Stock alert recipients lookup failed"
            );
            return;
        }
    };

    for estoque in estoques {
        if let Err(e) = notifier.notificar(estoque, &destinatarios).await {
            tracing::warn!(estoque_id = %estoque.base.id, error = %e, "Stock alert delivery failed");
        }
    }
}

#[async_trait]
impl AlertaEstoqueService for AlertaEstoqueManager {
    async fn cadastrar_alerta(&self, estoque_id: Uuid) -> AppResult<AlertaEstoqueResponse> {
        traced("alerta_estoque.cadastrar", async move {
            let uow = self.persistence.begin();

            // Row lock orders concurrent dedup checks for the same item
            let estoque = uow
                .estoques()
                .get_one(&Specification::por_id(estoque_id))
                .await?
                .ok_or_not_found("Estoque")?;

            let alerta = registrar_alerta(uow.as_ref(), &estoque)
                .await?
                .ok_or_else(|| {
                    AppError::already_registered(format!("AlertaEstoque for {} today", estoque_id))
                })?;
            uow.commit().await?;

            notificar(uow.as_ref(), self.notifier.as_ref(), std::slice::from_ref(&estoque)).await;
            Ok(alerta.into())
        })
        .await
    }

    async fn verificar_alerta_enviado_hoje(&self, estoque_id: Uuid) -> AppResult<bool> {
        traced("alerta_estoque.verificar_enviado_hoje", async move {
            let uow = self.persistence.begin();
            let alerta_id = uow
                .alertas_estoque()
                .get_one_projected_untracked(
                    &alerta_estoque::enviado_em(estoque_id, hoje()).select(|a| a.base.id),
                )
                .await?;
            Ok(alerta_id.is_some())
        })
        .await
    }

    async fn verificar_estoques_criticos(&self) -> AppResult<VerificacaoEstoque> {
        traced("alerta_estoque.verificar_criticos", async move {
            let uow = self.persistence.begin();

            let criticos = uow
                .estoques()
                .list(&estoque::critico().and(Specification::ativos()))
                .await?;

            let mut alertados = Vec::new();
            for item in &criticos {
                if registrar_alerta(uow.as_ref(), item).await?.is_some() {
                    alertados.push(item.clone());
                }
            }
            uow.commit().await?;

            notificar(uow.as_ref(), self.notifier.as_ref(), &alertados).await;

            let resultado = VerificacaoEstoque {
                criticos: criticos.len(),
                alertados: alertados.len(),
            };
            tracing::info!(
                criticos = resultado.criticos,
                alertados = resultado.alertados,
                "Critical stock sweep finished"
            );
            Ok(resultado)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CadastrarEstoque, CadastrarUsuario, TipoUsuario, Usuario};
    use crate::domain::{Cliente, InsumoOs, OrdemServico, Servico, Veiculo};
    use crate::infra::{Gateway, MemoryDatabase, MemoryPersistence, MockAlertaNotifier};
    use rust_decimal::Decimal;

    macro_rules! gateway_mock {
        ($nome:ident, $entidade:ident) => {
            mockall::mock! {
                $nome {}

                #[async_trait]
                impl Gateway<$entidade> for $nome {
                    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<$entidade>>;
                    async fn get_all(&self) -> AppResult<Vec<$entidade>>;
                    async fn create(&self, entity: &$entidade) -> AppResult<()>;
                    async fn create_many(&self, entities: &[$entidade]) -> AppResult<()>;
                    async fn update(&self, entity: &$entidade) -> AppResult<()>;
                    async fn update_many(&self, entities: &[$entidade]) -> AppResult<()>;
                    async fn delete(&self, id: Uuid) -> AppResult<()>;
                    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<()>;
                    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;
                    async fn get_one(
                        &self,
                        spec: &Specification<$entidade>,
                    ) -> AppResult<Option<$entidade>>;
                    async fn get_one_untracked(
                        &self,
                        spec: &Specification<$entidade>,
                    ) -> AppResult<Option<$entidade>>;
                    async fn list(&self, spec: &Specification<$entidade>) -> AppResult<Vec<$entidade>>;
                    async fn list_untracked(
                        &self,
                        spec: &Specification<$entidade>,
                    ) -> AppResult<Vec<$entidade>>;
                    async fn count(&self, spec: &Specification<$entidade>) -> AppResult<u64>;
                }
            }
        };
    }

    gateway_mock!(Usuarios, Usuario);
    gateway_mock!(Estoques, Estoque);

    /// Memory unit of work with some gateways swapped out
    struct Substituida {
        inner: Arc<dyn UnitOfWork>,
        usuarios: Option<Arc<dyn Gateway<Usuario>>>,
        estoques: Option<Arc<dyn Gateway<Estoque>>>,
    }

    #[async_trait]
    impl UnitOfWork for Substituida {
        fn clientes(&self) -> Arc<dyn Gateway<Cliente>> {
            self.inner.clientes()
        }

        fn veiculos(&self) -> Arc<dyn Gateway<Veiculo>> {
            self.inner.veiculos()
        }

        fn servicos(&self) -> Arc<dyn Gateway<Servico>> {
            self.inner.servicos()
        }

        fn estoques(&self) -> Arc<dyn Gateway<Estoque>> {
            self.estoques.clone().unwrap_or_else(|| self.inner.estoques())
        }

        fn ordens_servico(&self) -> Arc<dyn Gateway<OrdemServico>> {
            self.inner.ordens_servico()
        }

        fn insumos_os(&self) -> Arc<dyn Gateway<InsumoOs>> {
            self.inner.insumos_os()
        }

        fn usuarios(&self) -> Arc<dyn Gateway<Usuario>> {
            self.usuarios.clone().unwrap_or_else(|| self.inner.usuarios())
        }

        fn alertas_estoque(&self) -> Arc<dyn Gateway<AlertaEstoque>> {
            self.inner.alertas_estoque()
        }

        async fn commit(&self) -> AppResult<bool> {
            self.inner.commit().await
        }

        async fn rollback(&self) -> AppResult<()> {
            self.inner.rollback().await
        }
    }

    /// Hands out one prepared [`Substituida`] per `begin`
    struct Fabrica<F>(MemoryPersistence, F);

    impl<F> UnitOfWorkFactory for Fabrica<F>
    where
        F: Fn(Arc<dyn UnitOfWork>) -> Substituida + Send + Sync,
    {
        fn begin(&self) -> Arc<dyn UnitOfWork> {
            Arc::new((self.1)(self.0.begin()))
        }
    }

    async fn semear(db: &Arc<MemoryDatabase>) -> Estoque {
        let estoque = Estoque::new(CadastrarEstoque {
            insumo: "Junta".to_string(),
            descricao: String::new(),
            preco: Decimal::new(1990, 2),
            quantidade_disponivel: 1,
            quantidade_minima: 3,
        });
        let inscrito = Usuario::new(CadastrarUsuario {
            nome: "Paulo".to_string(),
            email: "paulo@oficina.com".to_string(),
            senha: "senha-segura".to_string(),
            tipo_usuario: TipoUsuario::Admin,
            recebe_alerta_estoque: true,
        })
        .unwrap();

        let uow = MemoryPersistence::new(db.clone()).begin();
        uow.estoques().create(&estoque).await.unwrap();
        uow.usuarios().create(&inscrito).await.unwrap();
        uow.commit().await.unwrap();
        estoque
    }

    #[tokio::test]
    async fn test_sweep_notifies_subscribers_after_commit() {
        let db = MemoryDatabase::new();
        let estoque = semear(&db).await;
        let esperado = estoque.base.id;

        let mut notifier = MockAlertaNotifier::new();
        notifier
            .expect_notificar()
            .withf(move |estoque, destinatarios| {
                estoque.base.id == esperado && destinatarios.len() == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let manager = AlertaEstoqueManager::new(
            Arc::new(MemoryPersistence::new(db.clone())),
            Arc::new(notifier),
        );
        let resultado = manager.verificar_estoques_criticos().await.unwrap();

        assert_eq!(resultado, VerificacaoEstoque { criticos: 1, alertados: 1 });
        assert!(manager.verificar_alerta_enviado_hoje(esperado).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_ignores_delivery_failure() {
        let db = MemoryDatabase::new();
        let estoque = semear(&db).await;

        let mut notifier = MockAlertaNotifier::new();
        notifier
            .expect_notificar()
            .times(1)
            .returning(|_, _| Err(AppError::internal("mail relay refused")));

        let manager = AlertaEstoqueManager::new(
            Arc::new(MemoryPersistence::new(db.clone())),
            Arc::new(notifier),
        );
        let resultado = manager.verificar_estoques_criticos().await.unwrap();

        assert_eq!(resultado.alertados, 1);
        assert!(manager
            .verificar_alerta_enviado_hoje(estoque.base.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_recipient_lookup_failure_keeps_committed_alert() {
        let db = MemoryDatabase::new();
        let estoque = semear(&db).await;

        let mut notifier = MockAlertaNotifier::new();
        notifier.expect_notificar().never();

        let fabrica = Fabrica(MemoryPersistence::new(db.clone()), |inner: Arc<dyn UnitOfWork>| {
            let mut usuarios = MockUsuarios::new();
            usuarios
                .expect_list_untracked()
                .returning(|_| Err(AppError::internal("connection reset")));
            Substituida {
                inner,
                usuarios: Some(Arc::new(usuarios)),
                estoques: None,
            }
        });
        let manager = AlertaEstoqueManager::new(Arc::new(fabrica), Arc::new(notifier));
        let commits = db.commits();

        let alerta = manager.cadastrar_alerta(estoque.base.id).await.unwrap();

        assert_eq!(alerta.estoque_id, estoque.base.id);
        assert_eq!(db.commits(), commits + 1);
        assert!(manager
            .verificar_alerta_enviado_hoje(estoque.base.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_dedup_checks_read_estoque_with_row_lock() {
        let db = MemoryDatabase::new();
        let estoque = semear(&db).await;

        let mut notifier = MockAlertaNotifier::new();
        notifier.expect_notificar().times(1).returning(|_, _| Ok(()));

        let item = estoque.clone();
        let fabrica = Fabrica(MemoryPersistence::new(db.clone()), move |inner: Arc<dyn UnitOfWork>| {
            let mut estoques = MockEstoques::new();
            let unico = item.clone();
            estoques
                .expect_get_one()
                .returning(move |_| Ok(Some(unico.clone())));
            let todos = item.clone();
            estoques
                .expect_list()
                .returning(move |_| Ok(vec![todos.clone()]));
            Substituida {
                inner,
                usuarios: None,
                estoques: Some(Arc::new(estoques)),
            }
        });
        let manager = AlertaEstoqueManager::new(Arc::new(fabrica), Arc::new(notifier));

        manager.cadastrar_alerta(estoque.base.id).await.unwrap();
        let resultado = manager.verificar_estoques_criticos().await.unwrap();

        assert_eq!(resultado, VerificacaoEstoque { criticos: 1, alertados: 0 });
    }
}
