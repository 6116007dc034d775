//! Usuarios command - Staff account management.
//!
//! Mainly used to create the first admin account:
//!
//! ```bash
//! cargo run -- usuarios cadastrar --nome Ana --email ana@oficina.com --senha ... --tipo admin
//! ```

use std::sync::Arc;

use crate::cli::args::{UsuariosAction, UsuariosArgs};
use crate::config::Config;
use crate::domain::CadastrarUsuario;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{UsuarioManager, UsuarioService};

/// Execute the usuarios command
pub async fn execute(args: UsuariosArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let usuarios = UsuarioManager::new(Arc::new(db.persistence()));

    match args.action {
        UsuariosAction::Cadastrar {
            nome,
            email,
            senha,
            tipo,
            recebe_alerta_estoque,
        } => {
            let usuario = usuarios
                .cadastrar(CadastrarUsuario {
                    nome,
                    email,
                    senha,
                    tipo_usuario: tipo,
                    recebe_alerta_estoque,
                })
                .await?;
            println!("Usuario {} ({}) created: {}", usuario.email, usuario.tipo_usuario, usuario.id);
        }
    }

    Ok(())
}
