use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::usecases::plans::{PlanError, PlanUseCase},
    domain::{
        repositories::{
            orders::OrderRepository, plans::PlanRepository,
            subscriptions::SubscriptionRepository, teams::TeamRepository,
        },
        value_objects::plans::{CreatePlanModel, UpdatePlanModel, UpgradeQuoteModel},
    },
    infrastructure::{
        axum_http::{
            auth::{AdminUser, AuthUser},
            error_responses::error_response,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                orders::OrderPostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
                teams::TeamPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let team_repository = TeamPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let order_repository = OrderPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = PlanUseCase::new(
        Arc::new(plan_repository),
        Arc::new(team_repository),
        Arc::new(subscription_repository),
        Arc::new(order_repository),
    );

    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/upgrade", get(upgrade_quote))
        .route("/:plan_id", get(get_one_plan).put(update_plan))
        .with_state(Arc::new(plan_usecase))
}

fn plan_error_response(err: PlanError) -> Response {
    let status = err.status_code();
    let message = match &err {
        PlanError::Internal(_) => "Internal server error".to_string(),
        _ => err.to_string(),
    };

    error_response(status, message)
}

pub async fn get_one_plan<P, T, S, O>(
    State(plan_usecase): State<Arc<PlanUseCase<P, T, S, O>>>,
    Path(plan_id): Path<i32>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match plan_usecase.get_one(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => plan_error_response(err),
    }
}

pub async fn list_plans<P, T, S, O>(
    State(plan_usecase): State<Arc<PlanUseCase<P, T, S, O>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    (StatusCode::OK, Json(plan_usecase.list().await)).into_response()
}

pub async fn create_plan<P, T, S, O>(
    State(plan_usecase): State<Arc<PlanUseCase<P, T, S, O>>>,
    _admin: AdminUser,
    Json(create_plan_model): Json<CreatePlanModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    (
        StatusCode::OK,
        Json(plan_usecase.create(create_plan_model).await),
    )
        .into_response()
}

pub async fn update_plan<P, T, S, O>(
    State(plan_usecase): State<Arc<PlanUseCase<P, T, S, O>>>,
    _admin: AdminUser,
    Path(plan_id): Path<i32>,
    Json(update_plan_model): Json<UpdatePlanModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    (
        StatusCode::OK,
        Json(plan_usecase.update(plan_id, update_plan_model).await),
    )
        .into_response()
}

pub async fn upgrade_quote<P, T, S, O>(
    State(plan_usecase): State<Arc<PlanUseCase<P, T, S, O>>>,
    AuthUser { user_id }: AuthUser,
    Query(upgrade_quote_model): Query<UpgradeQuoteModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match plan_usecase
        .upgrade(
            user_id,
            upgrade_quote_model.team_id,
            upgrade_quote_model.plan_id,
        )
        .await
    {
        Ok(charge) => (StatusCode::OK, Json(charge)).into_response(),
        Err(err) => plan_error_response(err),
    }
}
