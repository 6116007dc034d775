//! Shared fixtures for integration tests.
//!
//! Every test runs the real services over a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use rust_decimal::Decimal;
use uuid::Uuid;

use oficina_mecanica::config::Config;
use oficina_mecanica::domain::{
    CadastrarCliente, CadastrarEstoque, CadastrarServico, CadastrarUsuario, CadastrarVeiculo,
    Contato, Endereco, Estoque, Sexo, TipoCliente, TipoUsuario, Usuario,
};
use oficina_mecanica::errors::AppResult;
use oficina_mecanica::infra::{AlertaNotifier, MemoryDatabase, MemoryPersistence};
use oficina_mecanica::services::Services;

pub const JWT_SECRET: &str = "integration-test-secret-with-32-chars!";

mock! {
    pub Notifier {}

    #[async_trait]
    impl AlertaNotifier for Notifier {
        async fn notificar(&self, estoque: &Estoque, destinatarios: &[Usuario]) -> AppResult<()>;
    }
}

/// Notifier that accepts any number of deliveries
pub fn silent_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notificar().returning(|_, _| Ok(()));
    notifier
}

pub fn config() -> Config {
    Config::new("postgres://unused", JWT_SECRET)
}

pub struct Oficina {
    pub db: Arc<MemoryDatabase>,
    pub persistence: Arc<MemoryPersistence>,
    pub services: Services,
}

pub fn oficina() -> Oficina {
    oficina_with(silent_notifier())
}

pub fn oficina_with(notifier: MockNotifier) -> Oficina {
    let db = MemoryDatabase::new();
    let persistence = Arc::new(MemoryPersistence::new(db.clone()));
    let services = Services::new(persistence.clone(), Arc::new(notifier), config());
    Oficina {
        db,
        persistence,
        services,
    }
}

pub fn cliente(documento: &str) -> CadastrarCliente {
    CadastrarCliente {
        nome: "Joao Pereira".to_string(),
        documento: documento.to_string(),
        tipo_cliente: TipoCliente::PessoaFisica,
        sexo: Some(Sexo::Masculino),
        data_nascimento: NaiveDate::from_ymd_opt(1985, 3, 9),
        endereco: Endereco {
            rua: "Avenida Brasil".to_string(),
            numero: "1500".to_string(),
            bairro: "Jardim America".to_string(),
            cidade: "Curitiba".to_string(),
            estado: "PR".to_string(),
            cep: "80010-000".to_string(),
            complemento: Some("Sala 2".to_string()),
        },
        contato: Contato {
            telefone: "41988887777".to_string(),
            email: "joao@example.com".to_string(),
        },
    }
}

pub fn veiculo(cliente_id: Uuid, placa: &str) -> CadastrarVeiculo {
    CadastrarVeiculo {
        cliente_id,
        placa: placa.to_string(),
        marca: "Volkswagen".to_string(),
        modelo: "Gol".to_string(),
        cor: "Prata".to_string(),
        ano: 2018,
        anotacoes: None,
    }
}

/// Price given in cents
pub fn servico(nome: &str, centavos: i64) -> CadastrarServico {
    CadastrarServico {
        nome: nome.to_string(),
        descricao: format!("{} completa", nome),
        valor: Decimal::new(centavos, 2),
    }
}

/// Price given in cents
pub fn estoque(insumo: &str, centavos: i64, disponivel: i32, minimo: i32) -> CadastrarEstoque {
    CadastrarEstoque {
        insumo: insumo.to_string(),
        descricao: format!("{} para revisao", insumo),
        preco: Decimal::new(centavos, 2),
        quantidade_disponivel: disponivel,
        quantidade_minima: minimo,
    }
}

pub fn usuario(email: &str, senha: &str, recebe_alerta_estoque: bool) -> CadastrarUsuario {
    CadastrarUsuario {
        nome: "Carla Mendes".to_string(),
        email: email.to_string(),
        senha: senha.to_string(),
        tipo_usuario: TipoUsuario::Mecanico,
        recebe_alerta_estoque,
    }
}
