//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the request/response shapes that cross the
//! service boundary. No infrastructure dependencies.

pub mod alerta_estoque;
pub mod cliente;
pub mod entity;
pub mod estoque;
pub mod ordem_servico;
pub mod password;
pub mod servico;
pub mod usuario;
mod validation;
pub mod veiculo;

pub use alerta_estoque::{AlertaEstoque, AlertaEstoqueResponse};
pub use cliente::{
    AtualizarCliente, CadastrarCliente, Cliente, ClienteInclude, ClienteResponse, Contato,
    Endereco, Sexo, TipoCliente,
};
pub use entity::{DomainEntity, EntityBase, NoInclude};
pub use estoque::{AtualizarEstoque, CadastrarEstoque, Estoque, EstoqueResponse};
pub use ordem_servico::{
    AdicionarInsumo, AdicionarInsumos, AtualizarOrdemServico, CadastrarOrdemServico, InsumoOs,
    InsumoOsInclude, InsumoOsResponse, OrdemServico, OrdemServicoInclude, OrdemServicoResponse,
    StatusOrdemServico,
};
pub use password::Password;
pub use servico::{AtualizarServico, CadastrarServico, Servico, ServicoResponse};
pub use usuario::{AtualizarUsuario, CadastrarUsuario, TipoUsuario, Usuario, UsuarioResponse};
pub use validation::{CEP_REGEX, DOCUMENTO_REGEX, PLACA_REGEX, UF_REGEX};
pub use veiculo::{
    normalizar_placa, AtualizarVeiculo, CadastrarVeiculo, Veiculo, VeiculoInclude, VeiculoResponse,
};
