//! Authentication service - Login and token verification.
//!
//! Password hashing lives in the domain `Password` value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::traced;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{DomainEntity, Password, Usuario};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWorkFactory;
use crate::specifications::usuario as spec;

/// Valid argon2 hash verified against when the email is unknown, so both
/// paths pay for one hash verification.
static DUMMY_HASH: Lazy<Password> = Lazy::new(|| {
    Password::new("not-a-real-password")
        .unwrap_or_else(|_| Password::from_hash(String::new()))
});

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub tipo_usuario: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    /// A deactivated account yields `InactiveUser`.
    async fn login(&self, email: &str, senha: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(usuario: &Usuario, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: usuario.id(),
        email: usuario.email.clone(),
        tipo_usuario: usuario.tipo_usuario.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator {
    persistence: Arc<dyn UnitOfWorkFactory>,
    config: Config,
}

impl Authenticator {
    pub fn new(persistence: Arc<dyn UnitOfWorkFactory>, config: Config) -> Self {
        Self {
            persistence,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: &str, senha: &str) -> AppResult<TokenResponse> {
        traced("auth.login", async move {
            let uow = self.persistence.begin();
            let usuario = uow.usuarios().get_one_untracked(&spec::por_email(email)).await?;

            // Verify even when the email is unknown so response time does not
            // reveal which emails exist.
            let stored = usuario.as_ref().map_or(&*DUMMY_HASH, |u| &u.senha);
            let senha_valida = stored.verify(senha);

            let usuario = match usuario {
                Some(usuario) if senha_valida => usuario,
                _ => return Err(AppError::InvalidCredentials),
            };
            if !usuario.is_active() {
                return Err(AppError::InactiveUser);
            }

            tracing::info!(usuario_id = %usuario.id(), "Usuario logged in");
            generate_token(&usuario, &self.config)
        })
        .await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
