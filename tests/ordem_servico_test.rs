//! Service order lifecycle: stock reservation, budgeting and closing.

mod common;

use oficina_mecanica::domain::{
    AdicionarInsumo, AdicionarInsumos, AtualizarOrdemServico, CadastrarOrdemServico, Estoque,
    InsumoOs, OrdemServico, StatusOrdemServico,
};
use oficina_mecanica::errors::AppError;
use oficina_mecanica::services::ServiceContainer;
use oficina_mecanica::types::PaginationParams;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{cliente, estoque, oficina, servico, veiculo, Oficina};

struct Balcao {
    app: Oficina,
    cliente_id: Uuid,
    veiculo_id: Uuid,
    servico_id: Uuid,
    oleo_id: Uuid,
    filtro_id: Uuid,
}

async fn balcao() -> Balcao {
    let app = oficina();
    let dono = app.services.clientes().cadastrar(cliente("12345678901")).await.unwrap();
    let carro = app.services.veiculos().cadastrar(veiculo(dono.id, "ABC1234")).await.unwrap();
    let troca = app
        .services
        .servicos()
        .cadastrar(servico("Troca de oleo", 15000))
        .await
        .unwrap();
    let oleo = app.services.estoques().cadastrar(estoque("Oleo 5W30", 4200, 10, 2)).await.unwrap();
    let filtro = app
        .services
        .estoques()
        .cadastrar(estoque("Filtro de oleo", 3500, 5, 1))
        .await
        .unwrap();

    Balcao {
        app,
        cliente_id: dono.id,
        veiculo_id: carro.id,
        servico_id: troca.id,
        oleo_id: oleo.id,
        filtro_id: filtro.id,
    }
}

impl Balcao {
    fn abertura(&self) -> CadastrarOrdemServico {
        CadastrarOrdemServico {
            cliente_id: self.cliente_id,
            veiculo_id: self.veiculo_id,
            servico_id: self.servico_id,
            descricao: Some("Barulho no motor".to_string()),
        }
    }

    fn pecas(&self) -> AdicionarInsumos {
        AdicionarInsumos {
            insumos: vec![
                AdicionarInsumo {
                    estoque_id: self.oleo_id,
                    quantidade: 4,
                },
                AdicionarInsumo {
                    estoque_id: self.filtro_id,
                    quantidade: 1,
                },
                AdicionarInsumo {
                    estoque_id: self.oleo_id,
                    quantidade: 1,
                },
            ],
        }
    }

    fn disponivel(&self, estoque_id: Uuid) -> i32 {
        let item: Estoque = self.app.db.find(estoque_id).unwrap();
        item.quantidade_disponivel
    }

    async fn orcada(&self) -> Uuid {
        let ordens = self.app.services.ordens_servico();
        let ordem = ordens.cadastrar(self.abertura()).await.unwrap();
        ordens.adicionar_insumos(ordem.id, self.pecas()).await.unwrap();
        ordens.iniciar_diagnostico(ordem.id).await.unwrap();
        ordens.enviar_orcamento(ordem.id).await.unwrap();
        ordem.id
    }
}

#[tokio::test]
async fn test_cadastrar_opens_received_order_with_relations() {
    let balcao = balcao().await;

    let ordem = balcao.app.services.ordens_servico().cadastrar(balcao.abertura()).await.unwrap();

    assert_eq!(ordem.status, StatusOrdemServico::Recebida);
    assert!(ordem.orcamento.is_none());
    assert_eq!(ordem.cliente.as_ref().map(|c| c.id), Some(balcao.cliente_id));
    assert_eq!(ordem.veiculo.as_ref().map(|v| v.placa.as_str()), Some("ABC1234"));
    assert_eq!(ordem.servico.as_ref().map(|s| s.valor), Some(Decimal::new(15000, 2)));
    assert!(ordem.insumos.is_empty());
}

#[tokio::test]
async fn test_cadastrar_rejects_vehicle_of_other_customer() {
    let balcao = balcao().await;
    let outro = balcao
        .app
        .services
        .clientes()
        .cadastrar(cliente("98765432100"))
        .await
        .unwrap();

    let mut abertura = balcao.abertura();
    abertura.cliente_id = outro.id;
    let result = balcao.app.services.ordens_servico().cadastrar(abertura).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_cadastrar_requires_existing_servico() {
    let balcao = balcao().await;
    let mut abertura = balcao.abertura();
    abertura.servico_id = Uuid::new_v4();

    let result = balcao.app.services.ordens_servico().cadastrar(abertura).await;

    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_adicionar_insumos_reserves_grouped_stock() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let ordem = ordens.cadastrar(balcao.abertura()).await.unwrap();

    let com_pecas = ordens.adicionar_insumos(ordem.id, balcao.pecas()).await.unwrap();

    assert_eq!(com_pecas.insumos.len(), 2);
    let oleo = com_pecas
        .insumos
        .iter()
        .find(|i| i.estoque_id == balcao.oleo_id)
        .unwrap();
    assert_eq!(oleo.quantidade, 5);
    assert_eq!(balcao.disponivel(balcao.oleo_id), 5);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 4);
}

#[tokio::test]
async fn test_adicionar_insumos_insufficient_stock_reserves_nothing() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let ordem = ordens.cadastrar(balcao.abertura()).await.unwrap();
    let commits = balcao.app.db.commits();

    let pedido = AdicionarInsumos {
        insumos: vec![
            AdicionarInsumo {
                estoque_id: balcao.oleo_id,
                quantidade: 2,
            },
            AdicionarInsumo {
                estoque_id: balcao.filtro_id,
                quantidade: 6,
            },
        ],
    };
    let result = ordens.adicionar_insumos(ordem.id, pedido).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(balcao.disponivel(balcao.oleo_id), 10);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 5);
    assert_eq!(balcao.app.db.commits(), commits);
}

#[tokio::test]
async fn test_adicionar_insumos_rejects_empty_list() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let ordem = ordens.cadastrar(balcao.abertura()).await.unwrap();

    let result = ordens
        .adicionar_insumos(ordem.id, AdicionarInsumos { insumos: Vec::new() })
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_enviar_orcamento_prices_service_and_parts() {
    let balcao = balcao().await;
    let id = balcao.orcada().await;

    let ordem = balcao.app.services.ordens_servico().obter_por_id(id).await.unwrap();

    // 150.00 + 5 x 42.00 + 1 x 35.00
    assert_eq!(ordem.orcamento, Some(Decimal::new(39500, 2)));
    assert_eq!(ordem.status, StatusOrdemServico::AguardandoAprovacao);
    assert!(ordem.data_envio_orcamento.is_some());

    let tarde = balcao
        .app
        .services
        .ordens_servico()
        .adicionar_insumos(id, balcao.pecas())
        .await;
    assert!(matches!(tarde, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_full_lifecycle_consumes_stock() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let id = balcao.orcada().await;

    let cedo = ordens.entregar(id).await;
    assert!(matches!(cedo, Err(AppError::InvalidInput(_))));

    assert_eq!(
        ordens.aprovar_orcamento(id).await.unwrap().status,
        StatusOrdemServico::EmExecucao
    );
    let finalizada = ordens.finalizar_execucao(id).await.unwrap();
    assert!(finalizada.data_finalizacao.is_some());
    let entregue = ordens.entregar(id).await.unwrap();
    assert_eq!(entregue.status, StatusOrdemServico::Entregue);
    assert!(entregue.data_entrega.is_some());

    assert_eq!(balcao.disponivel(balcao.oleo_id), 5);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 4);

    let cancelar = ordens.cancelar(id).await;
    assert!(matches!(cancelar, Err(AppError::InvalidInput(_))));
    let editar = ordens
        .atualizar(
            id,
            AtualizarOrdemServico {
                descricao: Some("Depois da entrega".to_string()),
            },
        )
        .await;
    assert!(matches!(editar, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_cancelar_returns_reserved_stock() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let id = balcao.orcada().await;
    ordens.aprovar_orcamento(id).await.unwrap();

    let cancelada = ordens.cancelar(id).await.unwrap();

    assert_eq!(cancelada.status, StatusOrdemServico::Cancelada);
    assert_eq!(balcao.disponivel(balcao.oleo_id), 10);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 5);

    let de_novo = ordens.cancelar(id).await;
    assert!(matches!(de_novo, Err(AppError::InvalidInput(_))));
    assert_eq!(balcao.disponivel(balcao.oleo_id), 10);
}

#[tokio::test]
async fn test_recusar_orcamento_returns_reserved_stock() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let ordem = ordens.cadastrar(balcao.abertura()).await.unwrap();
    ordens.adicionar_insumos(ordem.id, balcao.pecas()).await.unwrap();

    let cedo = ordens.recusar_orcamento(ordem.id).await;
    assert!(matches!(cedo, Err(AppError::InvalidInput(_))));

    ordens.enviar_orcamento(ordem.id).await.unwrap();
    let recusada = ordens.recusar_orcamento(ordem.id).await.unwrap();

    assert_eq!(recusada.status, StatusOrdemServico::Cancelada);
    assert_eq!(balcao.disponivel(balcao.oleo_id), 10);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 5);
}

#[tokio::test]
async fn test_remover_deletes_line_items_and_returns_stock() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let ordem = ordens.cadastrar(balcao.abertura()).await.unwrap();
    let com_pecas = ordens.adicionar_insumos(ordem.id, balcao.pecas()).await.unwrap();

    ordens.remover(ordem.id).await.unwrap();

    assert!(balcao.app.db.find::<OrdemServico>(ordem.id).is_none());
    for insumo in &com_pecas.insumos {
        assert!(balcao.app.db.find::<InsumoOs>(insumo.id).is_none());
    }
    assert_eq!(balcao.disponivel(balcao.oleo_id), 10);
    assert_eq!(balcao.disponivel(balcao.filtro_id), 5);

    let result = ordens.obter_por_id(ordem.id).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_listar_filters_by_status() {
    let balcao = balcao().await;
    let ordens = balcao.app.services.ordens_servico();
    let primeira = ordens.cadastrar(balcao.abertura()).await.unwrap();
    ordens.cadastrar(balcao.abertura()).await.unwrap();
    ordens.iniciar_diagnostico(primeira.id).await.unwrap();

    let recebidas = ordens
        .listar(Some(StatusOrdemServico::Recebida), PaginationParams::default())
        .await
        .unwrap();
    let todas = ordens.listar(None, PaginationParams::default()).await.unwrap();

    assert_eq!(recebidas.meta.total, 1);
    assert_eq!(todas.meta.total, 2);
}
