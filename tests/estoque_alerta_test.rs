//! Stock movements and critical stock alerts.

mod common;

use oficina_mecanica::domain::{AlertaEstoque, AtualizarEstoque, Estoque};
use oficina_mecanica::errors::AppError;
use oficina_mecanica::infra::UnitOfWorkFactory;
use oficina_mecanica::services::ServiceContainer;
use oficina_mecanica::Specification;
use uuid::Uuid;

use common::{estoque, oficina, oficina_with, usuario, MockNotifier, Oficina};

async fn alertas(app: &Oficina) -> u64 {
    app.persistence
        .begin()
        .alertas_estoque()
        .count(&Specification::<AlertaEstoque>::all())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_obter_unknown_estoque_is_not_found() {
    let app = oficina();
    let result = app.services.estoques().obter_por_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_cadastrar_estoque_rejects_duplicate_insumo() {
    let app = oficina();
    app.services.estoques().cadastrar(estoque("Filtro de oleo", 3500, 10, 2)).await.unwrap();

    let result = app
        .services
        .estoques()
        .cadastrar(estoque("Filtro de oleo", 4000, 5, 1))
        .await;

    assert!(matches!(result, Err(AppError::DataAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_movimentar_rejects_negative_balance() {
    let app = oficina();
    let item = app.services.estoques().cadastrar(estoque("Vela", 2500, 3, 1)).await.unwrap();
    let commits = app.db.commits();

    let result = app.services.estoques().movimentar(item.id, -4).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    let stored: Estoque = app.db.find(item.id).unwrap();
    assert_eq!(stored.quantidade_disponivel, 3);
    assert_eq!(app.db.commits(), commits);
}

#[tokio::test]
async fn test_movimentar_into_critical_alerts_once_per_day() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notificar()
        .withf(|estoque, destinatarios| {
            estoque.insumo == "Pastilha de freio"
                && destinatarios.len() == 1
                && destinatarios[0].email == "estoque@oficina.com"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let app = oficina_with(notifier);

    app.services
        .usuarios()
        .cadastrar(usuario("estoque@oficina.com", "senha-segura", true))
        .await
        .unwrap();
    app.services
        .usuarios()
        .cadastrar(usuario("balcao@oficina.com", "senha-segura", false))
        .await
        .unwrap();
    let item = app
        .services
        .estoques()
        .cadastrar(estoque("Pastilha de freio", 8900, 10, 4))
        .await
        .unwrap();

    let acima = app.services.estoques().movimentar(item.id, -5).await.unwrap();
    assert_eq!(acima.quantidade_disponivel, 5);
    assert!(!acima.critico);
    assert_eq!(alertas(&app).await, 0);

    let critico = app.services.estoques().movimentar(item.id, -1).await.unwrap();
    assert!(critico.critico);
    assert_eq!(alertas(&app).await, 1);

    app.services.estoques().movimentar(item.id, -2).await.unwrap();
    assert_eq!(alertas(&app).await, 1);
    assert!(app
        .services
        .alertas_estoque()
        .verificar_alerta_enviado_hoje(item.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_notifier_failure_keeps_movement() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notificar()
        .times(1)
        .returning(|_, _| Err(AppError::internal("smtp down")));
    let app = oficina_with(notifier);
    let item = app.services.estoques().cadastrar(estoque("Correia", 15000, 2, 1)).await.unwrap();

    let result = app.services.estoques().movimentar(item.id, -1).await.unwrap();

    assert_eq!(result.quantidade_disponivel, 1);
    assert_eq!(alertas(&app).await, 1);
}

#[tokio::test]
async fn test_cadastrar_alerta_is_deduplicated_per_day() {
    let app = oficina();
    let item = app.services.estoques().cadastrar(estoque("Fluido", 4500, 1, 2)).await.unwrap();
    let alertas_service = app.services.alertas_estoque();

    assert!(!alertas_service.verificar_alerta_enviado_hoje(item.id).await.unwrap());

    let alerta = alertas_service.cadastrar_alerta(item.id).await.unwrap();
    assert_eq!(alerta.estoque_id, item.id);
    assert!(alertas_service.verificar_alerta_enviado_hoje(item.id).await.unwrap());

    let repetido = alertas_service.cadastrar_alerta(item.id).await;
    assert!(matches!(repetido, Err(AppError::DataAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_cadastrar_alerta_for_unknown_estoque() {
    let app = oficina();
    let result = app.services.alertas_estoque().cadastrar_alerta(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_verificar_estoques_criticos_sweep() {
    let app = oficina();
    let estoques = app.services.estoques();
    estoques.cadastrar(estoque("Lampada", 1200, 0, 2)).await.unwrap();
    estoques.cadastrar(estoque("Palheta", 3000, 2, 2)).await.unwrap();
    estoques.cadastrar(estoque("Aditivo", 2800, 20, 2)).await.unwrap();
    let removido = estoques.cadastrar(estoque("Fusivel", 300, 0, 5)).await.unwrap();
    estoques.remover(removido.id).await.unwrap();

    let primeira = app.services.alertas_estoque().verificar_estoques_criticos().await.unwrap();
    assert_eq!(primeira.criticos, 2);
    assert_eq!(primeira.alertados, 2);

    let segunda = app.services.alertas_estoque().verificar_estoques_criticos().await.unwrap();
    assert_eq!(segunda.criticos, 2);
    assert_eq!(segunda.alertados, 0);

    let criticos = estoques.listar_criticos().await.unwrap();
    assert_eq!(criticos.len(), 2);
}

#[tokio::test]
async fn test_atualizar_estoque_partial() {
    let app = oficina();
    let item = app.services.estoques().cadastrar(estoque("Oleo 5W30", 4200, 30, 5)).await.unwrap();

    let atualizado = app
        .services
        .estoques()
        .atualizar(
            item.id,
            AtualizarEstoque {
                quantidade_minima: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(atualizado.quantidade_minima, 10);
    assert_eq!(atualizado.quantidade_disponivel, 30);
    assert_eq!(atualizado.preco, item.preco);
    assert_eq!(atualizado.insumo, "Oleo 5W30");
}
