//! Staff accounts and authentication.

mod common;

use oficina_mecanica::config::TOKEN_TYPE_BEARER;
use oficina_mecanica::domain::{AtualizarUsuario, TipoUsuario, Usuario};
use oficina_mecanica::errors::AppError;
use oficina_mecanica::services::ServiceContainer;
use oficina_mecanica::types::PaginationParams;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use common::{oficina, usuario};

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let app = oficina();
    let criado = app
        .services
        .usuarios()
        .cadastrar(usuario("Carla@Oficina.com", "senha-segura", false))
        .await
        .unwrap();
    assert_eq!(criado.email, "carla@oficina.com");

    let token = assert_ok!(app.services.auth().login("carla@oficina.com", "senha-segura").await);
    assert_eq!(token.token_type, TOKEN_TYPE_BEARER);
    assert!(token.expires_in > 0);

    let claims = assert_ok!(app.services.auth().verify_token(&token.access_token));
    assert_eq!(claims.sub, criado.id);
    assert_eq!(claims.email, "carla@oficina.com");
    assert_eq!(claims.tipo_usuario, TipoUsuario::Mecanico.to_string());
}

#[tokio::test]
async fn test_login_failures_do_not_reveal_which_part_was_wrong() {
    let app = oficina();
    app.services
        .usuarios()
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();

    let senha_errada = app.services.auth().login("carla@oficina.com", "outra-senha").await;
    let email_errado = app.services.auth().login("ninguem@oficina.com", "senha-segura").await;

    assert!(matches!(senha_errada, Err(AppError::InvalidCredentials)));
    assert!(matches!(email_errado, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_deactivated_user_cannot_login() {
    let app = oficina();
    let criado = app
        .services
        .usuarios()
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();

    app.services.usuarios().desativar(criado.id).await.unwrap();

    let result = app.services.auth().login("carla@oficina.com", "senha-segura").await;
    assert!(matches!(result, Err(AppError::InactiveUser)));

    let stored: Usuario = app.db.find(criado.id).unwrap();
    assert!(!stored.base.ativo);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = oficina();
    app.services
        .usuarios()
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();
    let token = app
        .services
        .auth()
        .login("carla@oficina.com", "senha-segura")
        .await
        .unwrap();

    let adulterado = format!("{}x", token.access_token);
    let result = assert_err!(app.services.auth().verify_token(&adulterado));
    assert_eq!(result.code(), "TOKEN_ERROR");
}

#[tokio::test]
async fn test_email_is_unique() {
    let app = oficina();
    let usuarios = app.services.usuarios();
    usuarios
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();

    let result = usuarios
        .cadastrar(usuario("CARLA@oficina.com", "outra-senha", true))
        .await;

    assert!(matches!(result, Err(AppError::DataAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let app = oficina();
    let result = app
        .services
        .usuarios()
        .cadastrar(usuario("carla@oficina.com", "curta", false))
        .await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = oficina();
    let criado = app
        .services
        .usuarios()
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();

    app.services
        .usuarios()
        .atualizar(
            criado.id,
            AtualizarUsuario {
                senha: Some("nova-senha-forte".to_string()),
                tipo_usuario: Some(TipoUsuario::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let antiga = app.services.auth().login("carla@oficina.com", "senha-segura").await;
    assert!(matches!(antiga, Err(AppError::InvalidCredentials)));
    let token = app
        .services
        .auth()
        .login("carla@oficina.com", "nova-senha-forte")
        .await
        .unwrap();
    let claims = app.services.auth().verify_token(&token.access_token).unwrap();
    assert_eq!(claims.tipo_usuario, "admin");
}

#[tokio::test]
async fn test_remover_deletes_permanently() {
    let app = oficina();
    let usuarios = app.services.usuarios();
    let criado = usuarios
        .cadastrar(usuario("carla@oficina.com", "senha-segura", false))
        .await
        .unwrap();
    usuarios
        .cadastrar(usuario("bruno@oficina.com", "senha-segura", true))
        .await
        .unwrap();

    usuarios.remover(criado.id).await.unwrap();

    assert!(app.db.find::<Usuario>(criado.id).is_none());
    let pagina = usuarios.listar(PaginationParams::default()).await.unwrap();
    assert_eq!(pagina.meta.total, 1);
    assert_eq!(pagina.data[0].email, "bruno@oficina.com");

    let result = usuarios.remover(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::DataNotFound(_))));
}
