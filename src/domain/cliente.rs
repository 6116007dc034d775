//! Cliente (customer) domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{DomainEntity, EntityBase};
use super::validation::{apply_text, apply_value, CEP_REGEX, DOCUMENTO_REGEX, UF_REGEX};
use super::veiculo::{Veiculo, VeiculoResponse};
use crate::errors::AppError;

/// Person or company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoCliente {
    PessoaFisica,
    PessoaJuridica,
}

impl TipoCliente {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoCliente::PessoaFisica => "pessoa_fisica",
            TipoCliente::PessoaJuridica => "pessoa_juridica",
        }
    }
}

impl std::str::FromStr for TipoCliente {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pessoa_fisica" => Ok(TipoCliente::PessoaFisica),
            "pessoa_juridica" => Ok(TipoCliente::PessoaJuridica),
            other => Err(AppError::invalid(format!("Unknown tipo_cliente '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sexo {
    Masculino,
    Feminino,
    Outro,
}

impl Sexo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sexo::Masculino => "masculino",
            Sexo::Feminino => "feminino",
            Sexo::Outro => "outro",
        }
    }
}

impl std::str::FromStr for Sexo {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masculino" => Ok(Sexo::Masculino),
            "feminino" => Ok(Sexo::Feminino),
            "outro" => Ok(Sexo::Outro),
            other => Err(AppError::invalid(format!("Unknown sexo '{}'", other))),
        }
    }
}

/// Customer address (one per Cliente)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Endereco {
    #[validate(length(min = 1, message = "Rua is required"))]
    pub rua: String,
    #[validate(length(min = 1, message = "Numero is required"))]
    pub numero: String,
    #[validate(length(min = 1, message = "Bairro is required"))]
    pub bairro: String,
    #[validate(length(min = 1, message = "Cidade is required"))]
    pub cidade: String,
    #[validate(regex(path = *UF_REGEX, message = "Estado must be a two-letter code"))]
    pub estado: String,
    #[validate(regex(path = *CEP_REGEX, message = "Invalid CEP"))]
    pub cep: String,
    pub complemento: Option<String>,
}

/// Customer contact (one per Cliente)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Contato {
    #[validate(length(min = 8, max = 20, message = "Invalid telefone"))]
    pub telefone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Related data loadable with a Cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClienteInclude {
    Veiculos,
}

/// Cliente domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    #[serde(flatten)]
    pub base: EntityBase,
    pub nome: String,
    pub documento: String,
    pub tipo_cliente: TipoCliente,
    pub sexo: Option<Sexo>,
    pub data_nascimento: Option<NaiveDate>,
    pub endereco: Endereco,
    pub contato: Contato,
    /// Loaded only with [`ClienteInclude::Veiculos`]
    #[serde(default)]
    pub veiculos: Vec<Veiculo>,
}

impl DomainEntity for Cliente {
    type Include = ClienteInclude;
    const NAME: &'static str = "Cliente";

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

impl Cliente {
    pub fn new(dados: CadastrarCliente) -> Self {
        Self {
            base: EntityBase::new(),
            nome: dados.nome.trim().to_string(),
            documento: dados.documento,
            tipo_cliente: dados.tipo_cliente,
            sexo: dados.sexo,
            data_nascimento: dados.data_nascimento,
            endereco: dados.endereco,
            contato: dados.contato,
            veiculos: Vec::new(),
        }
    }

    /// Partial update: only present, non-blank fields are applied.
    pub fn atualizar(&mut self, dados: &AtualizarCliente) {
        let mut changed = apply_text(&mut self.nome, dados.nome.as_deref());

        if dados.sexo.is_some() && dados.sexo != self.sexo {
            self.sexo = dados.sexo;
            changed = true;
        }
        changed |= apply_value(&mut self.tipo_cliente, dados.tipo_cliente.as_ref());
        if dados.data_nascimento.is_some() && dados.data_nascimento != self.data_nascimento {
            self.data_nascimento = dados.data_nascimento;
            changed = true;
        }
        changed |= apply_value(&mut self.endereco, dados.endereco.as_ref());
        changed |= apply_value(&mut self.contato, dados.contato.as_ref());

        if changed {
            self.base.touch();
        }
    }
}

/// Cliente creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CadastrarCliente {
    #[validate(length(min = 1, max = 200, message = "Nome is required"))]
    pub nome: String,
    #[validate(regex(path = *DOCUMENTO_REGEX, message = "Documento must have 11 or 14 digits"))]
    pub documento: String,
    pub tipo_cliente: TipoCliente,
    pub sexo: Option<Sexo>,
    pub data_nascimento: Option<NaiveDate>,
    #[validate(nested)]
    pub endereco: Endereco,
    #[validate(nested)]
    pub contato: Contato,
}

/// Cliente update data transfer object (every field optional)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarCliente {
    #[validate(length(max = 200, message = "Nome is too long"))]
    pub nome: Option<String>,
    pub tipo_cliente: Option<TipoCliente>,
    pub sexo: Option<Sexo>,
    pub data_nascimento: Option<NaiveDate>,
    #[validate(nested)]
    pub endereco: Option<Endereco>,
    #[validate(nested)]
    pub contato: Option<Contato>,
}

/// Cliente response
#[derive(Debug, Clone, Serialize)]
pub struct ClienteResponse {
    pub id: Uuid,
    pub nome: String,
    pub documento: String,
    pub tipo_cliente: TipoCliente,
    pub sexo: Option<Sexo>,
    pub data_nascimento: Option<NaiveDate>,
    pub endereco: Endereco,
    pub contato: Contato,
    pub veiculos: Vec<VeiculoResponse>,
    pub ativo: bool,
    pub data_cadastro: DateTime<Utc>,
}

impl From<Cliente> for ClienteResponse {
    fn from(cliente: Cliente) -> Self {
        Self {
            id: cliente.base.id,
            nome: cliente.nome,
            documento: cliente.documento,
            tipo_cliente: cliente.tipo_cliente,
            sexo: cliente.sexo,
            data_nascimento: cliente.data_nascimento,
            endereco: cliente.endereco,
            contato: cliente.contato,
            veiculos: cliente.veiculos.into_iter().map(VeiculoResponse::from).collect(),
            ativo: cliente.base.ativo,
            data_cadastro: cliente.base.data_cadastro,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn cadastro() -> CadastrarCliente {
        CadastrarCliente {
            nome: "Maria Silva".to_string(),
            documento: "12345678901".to_string(),
            tipo_cliente: TipoCliente::PessoaFisica,
            sexo: Some(Sexo::Feminino),
            data_nascimento: NaiveDate::from_ymd_opt(1990, 5, 17),
            endereco: Endereco {
                rua: "Rua das Flores".to_string(),
                numero: "100".to_string(),
                bairro: "Centro".to_string(),
                cidade: "Sao Paulo".to_string(),
                estado: "SP".to_string(),
                cep: "01001-000".to_string(),
                complemento: None,
            },
            contato: Contato {
                telefone: "11999990000".to_string(),
                email: "maria@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_atualizar_only_nome_keeps_other_fields() {
        let mut cliente = Cliente::new(cadastro());
        let before = cliente.clone();

        cliente.atualizar(&AtualizarCliente {
            nome: Some("Maria Souza".to_string()),
            ..Default::default()
        });

        assert_eq!(cliente.nome, "Maria Souza");
        assert_eq!(cliente.sexo, before.sexo);
        assert_eq!(cliente.tipo_cliente, before.tipo_cliente);
        assert_eq!(cliente.data_nascimento, before.data_nascimento);
        assert!(cliente.base.data_atualizacao.is_some());
    }

    #[test]
    fn test_atualizar_with_nothing_is_noop() {
        let mut cliente = Cliente::new(cadastro());
        let before = cliente.clone();

        cliente.atualizar(&AtualizarCliente::default());

        assert_eq!(cliente.nome, before.nome);
        assert_eq!(cliente.endereco, before.endereco);
        assert_eq!(cliente.contato, before.contato);
        assert_eq!(cliente.base, before.base);
    }

    #[test]
    fn test_atualizar_ignores_blank_nome() {
        let mut cliente = Cliente::new(cadastro());
        cliente.atualizar(&AtualizarCliente {
            nome: Some("  ".to_string()),
            ..Default::default()
        });
        assert_eq!(cliente.nome, "Maria Silva");
    }

    #[test]
    fn test_cadastro_validation() {
        assert!(cadastro().validate().is_ok());

        let mut invalido = cadastro();
        invalido.documento = "123".to_string();
        invalido.endereco.estado = "Sao Paulo".to_string();
        assert!(invalido.validate().is_err());
    }

    #[test]
    fn test_same_identity() {
        let a = Cliente::new(cadastro());
        let mut b = a.clone();
        b.nome = "Outro".to_string();
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&Cliente::new(cadastro())));
    }
}
