use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::{
    application::usecases::auth::{AuthError, AuthUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            plans::SuccessResponse,
            users::{LoginModel, RegisterUserModel},
        },
    },
    infrastructure::{
        axum_http::{
            auth::{TokenVerifier, access_token_cookie, clear_token_cookies},
            error_responses::error_response,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let auth_usecase = AuthUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state((Arc::new(auth_usecase), config))
}

fn auth_error_response(err: AuthError) -> Response {
    let status = err.status_code();
    let message = match &err {
        AuthError::Internal(_) => "Internal server error".to_string(),
        _ => err.to_string(),
    };

    error_response(status, message)
}

pub async fn register<U>(
    State((auth_usecase, _)): State<(Arc<AuthUseCase<U>>, Arc<DotEnvyConfig>)>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match auth_usecase.register(register_user_model).await {
        Ok(registered) => (StatusCode::CREATED, Json(registered)).into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub async fn login<U>(
    State((auth_usecase, config)): State<(Arc<AuthUseCase<U>>, Arc<DotEnvyConfig>)>,
    jar: CookieJar,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    let logged_in = match auth_usecase.login(login_model).await {
        Ok(logged_in) => logged_in,
        Err(err) => return auth_error_response(err),
    };

    match TokenVerifier::new(&config.jwt.secret).sign(logged_in.user_id) {
        Ok(token) => (
            jar.add(access_token_cookie(token)),
            (StatusCode::OK, Json(logged_in)),
        )
            .into_response(),
        Err(err) => {
            error!(user_id = %logged_in.user_id, error = ?err, "auth: failed to sign access token");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        clear_token_cookies(jar),
        (StatusCode::OK, Json(SuccessResponse { success: true })),
    )
        .into_response()
}
