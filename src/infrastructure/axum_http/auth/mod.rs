use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::config_model::DotEnvyConfig;
use crate::domain::repositories::users::UserRepository;
use crate::infrastructure::axum_http::error_responses::error_response;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

const ACCESS_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize,
}

/// Stateless HS256 verifier; holds the signing secret from the process-wide
/// config, no storage access.
pub struct TokenVerifier {
    secret: String,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    pub fn sign(&self, user_id: i32) -> Result<String> {
        let exp = (Utc::now() + Duration::days(ACCESS_TOKEN_TTL_DAYS)).timestamp() as usize;
        let claims = Claims { user_id, exp };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| anyhow!("failed to sign access token: {}", e))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("token validation failed: {}", e))?;

        Ok(token_data.claims)
    }
}

pub fn access_token_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(cookie::time::Duration::days(ACCESS_TOKEN_TTL_DAYS))
        .build()
}

/// Removal cookies for both tokens, forcing the client to re-authenticate.
/// Expired cookies are added explicitly so the removal headers go out even
/// when the jar was not built from the request.
pub fn clear_token_cookies(jar: CookieJar) -> CookieJar {
    let expired = |name: &'static str| {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .max_age(cookie::time::Duration::ZERO)
            .build()
    };

    jar.add(expired(ACCESS_TOKEN_COOKIE))
        .add(expired(REFRESH_TOKEN_COOKIE))
}

/// Rejection for the auth extractors. An unverifiable token clears the
/// session cookies on the way out; a verified-but-insufficient identity does
/// not.
#[derive(Debug)]
pub struct AuthRejection {
    clear_session: bool,
}

impl AuthRejection {
    fn invalid_token() -> Self {
        Self {
            clear_session: true,
        }
    }

    fn insufficient() -> Self {
        Self {
            clear_session: false,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = error_response(StatusCode::UNAUTHORIZED, "Unauthorized".to_string());
        if self.clear_session {
            (clear_token_cookies(CookieJar::new()), body).into_response()
        } else {
            body
        }
    }
}

/// Identity verified from the access-token cookie. No storage access.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Identity verified like [`AuthUser`], then required to carry the
/// administrative flag in storage. A missing user, a non-admin user, and a
/// failed lookup are deliberately indistinguishable to the caller.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: i32,
}

fn verify_request_token(parts: &Parts) -> Result<Claims, AuthRejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(AuthRejection::invalid_token)?;

    let config = parts
        .extensions
        .get::<Arc<DotEnvyConfig>>()
        .cloned()
        .ok_or_else(AuthRejection::invalid_token)?;

    TokenVerifier::new(&config.jwt.secret)
        .verify(&token)
        .map_err(|_| AuthRejection::invalid_token())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = verify_request_token(parts)?;

        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = verify_request_token(parts)?;

        let db_pool = parts
            .extensions
            .get::<Arc<PgPoolSquad>>()
            .cloned()
            .ok_or_else(AuthRejection::insufficient)?;

        let user_repository = UserPostgres::new(db_pool);
        let admin = match user_repository.find_admin_by_id(claims.user_id).await {
            Ok(admin) => admin,
            Err(err) => {
                warn!(user_id = %claims.user_id, db_error = ?err, "auth: admin lookup failed");
                None
            }
        };

        admin
            .map(|user| AdminUser { user_id: user.id })
            .ok_or_else(AuthRejection::insufficient)
    }
}

#[cfg(test)]
mod tests;
