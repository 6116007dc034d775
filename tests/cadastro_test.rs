//! Customer, vehicle and service catalog use cases over the in-memory store.

mod common;

use oficina_mecanica::domain::{
    AtualizarCliente, AtualizarServico, AtualizarVeiculo, Contato, Veiculo,
};
use oficina_mecanica::errors::AppError;
use oficina_mecanica::services::ServiceContainer;
use oficina_mecanica::types::PaginationParams;
use oficina_mecanica::Cliente;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{cliente, oficina, servico, veiculo};

#[tokio::test]
async fn test_cadastrar_cliente_rejects_duplicate_documento() {
    let app = oficina();
    let clientes = app.services.clientes();

    clientes.cadastrar(cliente("12345678901")).await.unwrap();
    let result = clientes.cadastrar(cliente("12345678901")).await;

    assert!(matches!(result, Err(AppError::DataAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_cadastrar_cliente_validates_input() {
    let app = oficina();
    let mut dados = cliente("123");
    dados.endereco.cep = "abc".to_string();

    let result = app.services.clientes().cadastrar(dados).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(app.db.commits(), 0);
}

#[tokio::test]
async fn test_atualizar_cliente_partial_keeps_other_fields() {
    let app = oficina();
    let clientes = app.services.clientes();
    let original = clientes.cadastrar(cliente("12345678901")).await.unwrap();

    let atualizado = clientes
        .atualizar(
            original.id,
            AtualizarCliente {
                contato: Some(Contato {
                    telefone: "41911112222".to_string(),
                    email: "joao.novo@example.com".to_string(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(atualizado.contato.email, "joao.novo@example.com");
    assert_eq!(atualizado.nome, original.nome);
    assert_eq!(atualizado.documento, original.documento);
    assert_eq!(atualizado.endereco, original.endereco);
    assert_eq!(atualizado.data_nascimento, original.data_nascimento);

    let stored: Cliente = app.db.find(original.id).unwrap();
    assert_eq!(stored.contato.telefone, "41911112222");
    assert!(stored.base.data_atualizacao.is_some());
}

#[tokio::test]
async fn test_remover_cliente_is_soft_delete() {
    let app = oficina();
    let clientes = app.services.clientes();
    let criado = clientes.cadastrar(cliente("12345678901")).await.unwrap();

    clientes.remover(criado.id).await.unwrap();

    let stored: Cliente = app.db.find(criado.id).unwrap();
    assert!(!stored.base.ativo);

    let pagina = clientes.listar(PaginationParams::default()).await.unwrap();
    assert_eq!(pagina.meta.total, 0);

    let result = clientes.atualizar(criado.id, AtualizarCliente::default()).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_remover_unknown_cliente_is_not_found() {
    let app = oficina();
    let result = app.services.clientes().remover(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_obter_cliente_loads_veiculos() {
    let app = oficina();
    let dono = app.services.clientes().cadastrar(cliente("12345678901")).await.unwrap();
    app.services.veiculos().cadastrar(veiculo(dono.id, "ABC1234")).await.unwrap();
    app.services.veiculos().cadastrar(veiculo(dono.id, "BRA2E19")).await.unwrap();

    let por_id = app.services.clientes().obter_por_id(dono.id).await.unwrap();
    assert_eq!(por_id.veiculos.len(), 2);

    let por_documento = app
        .services
        .clientes()
        .obter_por_documento("12345678901")
        .await
        .unwrap();
    assert_eq!(por_documento.id, dono.id);

    let todos = app.services.clientes().listar_com_veiculos().await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].veiculos.len(), 2);
}

#[tokio::test]
async fn test_listar_clientes_pages_results() {
    let app = oficina();
    for documento in ["11111111111", "22222222222", "33333333333"] {
        app.services.clientes().cadastrar(cliente(documento)).await.unwrap();
    }

    let pagina = app
        .services
        .clientes()
        .listar(PaginationParams::new(2, 2))
        .await
        .unwrap();

    assert_eq!(pagina.data.len(), 1);
    assert_eq!(pagina.meta.total, 3);
    assert_eq!(pagina.meta.total_pages, 2);
}

#[tokio::test]
async fn test_listar_page_past_the_end_is_empty() {
    let app = oficina();
    app.services.clientes().cadastrar(cliente("11111111111")).await.unwrap();

    let pagina = app
        .services
        .clientes()
        .listar(PaginationParams::new(u64::MAX, 10))
        .await
        .unwrap();

    assert!(pagina.data.is_empty());
    assert_eq!(pagina.meta.total, 1);
    assert_eq!(pagina.meta.page, u64::MAX);
}

#[tokio::test]
async fn test_cadastrar_veiculo_normalizes_placa() {
    let app = oficina();
    let dono = app.services.clientes().cadastrar(cliente("12345678901")).await.unwrap();

    let criado = app
        .services
        .veiculos()
        .cadastrar(veiculo(dono.id, "abc-1234"))
        .await
        .unwrap();
    assert_eq!(criado.placa, "ABC1234");

    let encontrado = app.services.veiculos().obter_por_placa("abc 1234").await.unwrap();
    assert_eq!(encontrado.id, criado.id);

    let duplicado = app.services.veiculos().cadastrar(veiculo(dono.id, "ABC1234")).await;
    assert!(matches!(duplicado, Err(AppError::DataAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_obter_veiculo_loads_cliente() {
    let app = oficina();
    let dono = app.services.clientes().cadastrar(cliente("12345678901")).await.unwrap();
    let criado = app.services.veiculos().cadastrar(veiculo(dono.id, "ABC1234")).await.unwrap();
    assert!(criado.cliente.is_none());

    let por_id = app.services.veiculos().obter_por_id(criado.id).await.unwrap();
    let proprietario = por_id.cliente.expect("cliente loaded");
    assert_eq!(proprietario.id, dono.id);
    assert_eq!(proprietario.documento, "12345678901");

    let por_placa = app.services.veiculos().obter_por_placa("ABC-1234").await.unwrap();
    assert_eq!(por_placa.cliente.map(|c| c.id), Some(dono.id));

    let stored: Veiculo = app.db.find(criado.id).unwrap();
    assert!(stored.cliente.is_none());
}

#[tokio::test]
async fn test_cadastrar_veiculo_requires_cliente() {
    let app = oficina();
    let result = app
        .services
        .veiculos()
        .cadastrar(veiculo(Uuid::new_v4(), "ABC1234"))
        .await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}

#[tokio::test]
async fn test_veiculos_por_cliente_skips_removed() {
    let app = oficina();
    let dono = app.services.clientes().cadastrar(cliente("12345678901")).await.unwrap();
    let outro = app.services.clientes().cadastrar(cliente("98765432100")).await.unwrap();
    let vendido = app.services.veiculos().cadastrar(veiculo(dono.id, "ABC1234")).await.unwrap();
    app.services.veiculos().cadastrar(veiculo(dono.id, "BRA2E19")).await.unwrap();
    app.services.veiculos().cadastrar(veiculo(outro.id, "XYZ9876")).await.unwrap();

    app.services.veiculos().remover(vendido.id).await.unwrap();

    let veiculos = app.services.veiculos().listar_por_cliente(dono.id).await.unwrap();
    assert_eq!(veiculos.len(), 1);
    assert_eq!(veiculos[0].placa, "BRA2E19");

    let atualizado = app
        .services
        .veiculos()
        .atualizar(
            veiculos[0].id,
            AtualizarVeiculo {
                cor: Some("Preto".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(atualizado.cor, "Preto");
    assert_eq!(atualizado.modelo, "Gol");
}

#[tokio::test]
async fn test_servico_nome_is_unique() {
    let app = oficina();
    let servicos = app.services.servicos();
    let troca = servicos.cadastrar(servico("Troca de oleo", 12000)).await.unwrap();
    let revisao = servicos.cadastrar(servico("Revisao", 35000)).await.unwrap();

    let duplicado = servicos.cadastrar(servico("Troca de oleo", 9000)).await;
    assert!(matches!(duplicado, Err(AppError::DataAlreadyRegistered(_))));

    let renomeado = servicos
        .atualizar(
            revisao.id,
            AtualizarServico {
                nome: Some("Troca de oleo".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(renomeado, Err(AppError::DataAlreadyRegistered(_))));

    let reajustado = servicos
        .atualizar(
            troca.id,
            AtualizarServico {
                valor: Some(Decimal::new(15000, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reajustado.valor, Decimal::new(15000, 2));
    assert_eq!(reajustado.nome, "Troca de oleo");
}

#[tokio::test]
async fn test_servico_rejects_negative_valor() {
    let app = oficina();
    let result = app.services.servicos().cadastrar(servico("Alinhamento", -100)).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}
