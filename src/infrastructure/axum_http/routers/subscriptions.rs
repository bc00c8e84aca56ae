use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    application::usecases::subscriptions::{SubscriptionError, SubscriptionUseCase},
    domain::{
        repositories::{
            orders::OrderRepository, plans::PlanRepository,
            subscriptions::SubscriptionRepository, teams::TeamRepository,
        },
        value_objects::{
            plans::SuccessResponse,
            subscriptions::{CurrentSubscriptionQuery, RenewModel, SubscribeModel},
        },
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
    let team_repository = TeamPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let order_repository = OrderPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(team_repository),
        Arc::new(subscription_repository),
        Arc::new(plan_repository),
        Arc::new(order_repository),
    );

    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/current", get(current_subscription))
        .route("/renew", post(renew))
        .route("/orders/:order_id/activate", post(activate_order))
        .with_state(Arc::new(subscription_usecase))
}

fn subscription_error_response(err: SubscriptionError) -> Response {
    let status = err.status_code();
    let message = match &err {
        SubscriptionError::Internal(_) => "Internal server error".to_string(),
        _ => err.to_string(),
    };

    error_response(status, message)
}

pub async fn subscribe<T, S, P, O>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T, S, P, O>>>,
    AuthUser { user_id }: AuthUser,
    Json(subscribe_model): Json<SubscribeModel>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match subscription_usecase
        .subscribe(user_id, subscribe_model.team_id, subscribe_model.plan_id)
        .await
    {
        Ok(subscribed) => (StatusCode::CREATED, Json(subscribed)).into_response(),
        Err(err) => subscription_error_response(err),
    }
}

pub async fn current_subscription<T, S, P, O>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T, S, P, O>>>,
    AuthUser { user_id }: AuthUser,
    Query(query): Query<CurrentSubscriptionQuery>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match subscription_usecase.current(user_id, query.team_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => subscription_error_response(err),
    }
}

pub async fn renew<T, S, P, O>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T, S, P, O>>>,
    AuthUser { user_id }: AuthUser,
    Json(renew_model): Json<RenewModel>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match subscription_usecase.renew(user_id, renew_model.team_id).await {
        Ok(renewed) => (StatusCode::CREATED, Json(renewed)).into_response(),
        Err(err) => subscription_error_response(err),
    }
}

/// Payment confirmations come from an operator for now, hence the admin tier.
pub async fn activate_order<T, S, P, O>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T, S, P, O>>>,
    _admin: AdminUser,
    Path(order_id): Path<i32>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    match subscription_usecase.activate_order(order_id).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(err) => subscription_error_response(err),
    }
}
