use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::error;

use crate::{
    application::usecases::teams::TeamUseCase,
    domain::{repositories::teams::TeamRepository, value_objects::teams::InsertTeamModel},
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{postgres_connection::PgPoolSquad, repositories::teams::TeamPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let team_repository = TeamPostgres::new(Arc::clone(&db_pool));
    let team_usecase = TeamUseCase::new(Arc::new(team_repository));

    Router::new()
        .route("/", get(list_teams).post(create_team))
        .with_state(Arc::new(team_usecase))
}

pub async fn list_teams<T>(
    State(team_usecase): State<Arc<TeamUseCase<T>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
{
    match team_usecase.list(user_id).await {
        Ok(teams) => (StatusCode::OK, Json(teams)).into_response(),
        Err(err) => {
            error!(%user_id, db_error = ?err, "teams: failed to list teams");
            AppError::Internal(err).into_response()
        }
    }
}

pub async fn create_team<T>(
    State(team_usecase): State<Arc<TeamUseCase<T>>>,
    AuthUser { user_id }: AuthUser,
    Json(insert_team_model): Json<InsertTeamModel>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
{
    match team_usecase.create(user_id, insert_team_model).await {
        Ok(team) => (StatusCode::CREATED, Json(team)).into_response(),
        Err(err) => {
            error!(%user_id, db_error = ?err, "teams: failed to create team");
            AppError::Internal(err).into_response()
        }
    }
}
