//! Cliente filters.

use sea_orm::{ColumnTrait, Condition};

use super::Specification;
use crate::domain::{Cliente, ClienteInclude};
use crate::infra::repositories::entities::cliente::Column;

/// Customer with the given CPF/CNPJ
pub fn por_documento(documento: &str) -> Specification<Cliente> {
    let documento = documento.to_string();
    Specification::new(
        Condition::all().add(Column::Documento.eq(documento.clone())),
        move |cliente: &Cliente| cliente.documento == documento,
    )
}

/// Every customer, vehicles loaded
pub fn com_veiculos() -> Specification<Cliente> {
    Specification::all().with_include(ClienteInclude::Veiculos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cliente::tests::cadastro;

    #[test]
    fn test_por_documento() {
        let cliente = Cliente::new(cadastro());
        assert!(por_documento("12345678901").is_satisfied_by(&cliente));
        assert!(!por_documento("98765432100").is_satisfied_by(&cliente));
    }

    #[test]
    fn test_com_veiculos_matches_all_and_includes() {
        let spec = com_veiculos();
        assert!(spec.is_satisfied_by(&Cliente::new(cadastro())));
        assert_eq!(spec.includes(), &[ClienteInclude::Veiculos]);
    }
}
