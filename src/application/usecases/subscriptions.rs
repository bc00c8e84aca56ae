use std::sync::Arc;

use anyhow::anyhow;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::usecases::plans::CYCLE_DAYS;
use crate::domain::{
    entities::{
        orders::{InsertOrderEntity, InsertSubscriptionActivationEntity},
        subscriptions::InsertSubscriptionEntity,
    },
    repositories::{
        orders::OrderRepository, plans::PlanRepository, subscriptions::SubscriptionRepository,
        teams::TeamRepository,
    },
    value_objects::subscriptions::{RenewedModel, SubscribedModel, SubscriptionStatusModel},
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("team not found")]
    TeamNotFound,
    #[error("not found")]
    PlanNotFound,
    #[error("This team already has a subscription.")]
    AlreadySubscribed,
    #[error("This team is not subscribe.")]
    NotSubscribed,
    #[error("There is no active subscription for the given team.")]
    InactiveSubscription,
    #[error("invalid subscription.")]
    InvalidSubscription,
    #[error("not payed.")]
    UnpaidOrder,
    #[error("The current paid period has not elapsed yet.")]
    PeriodNotElapsed,
    #[error("order not found")]
    OrderNotFound,
    #[error("order is already payed.")]
    AlreadyActivated,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::TeamNotFound
            | SubscriptionError::PlanNotFound
            | SubscriptionError::OrderNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::AlreadySubscribed
            | SubscriptionError::NotSubscribed
            | SubscriptionError::InactiveSubscription
            | SubscriptionError::InvalidSubscription
            | SubscriptionError::UnpaidOrder
            | SubscriptionError::PeriodNotElapsed
            | SubscriptionError::AlreadyActivated => StatusCode::BAD_REQUEST,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type SubscriptionResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<T, S, P, O>
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    team_repository: Arc<T>,
    subscription_repository: Arc<S>,
    plan_repository: Arc<P>,
    order_repository: Arc<O>,
}

impl<T, S, P, O> SubscriptionUseCase<T, S, P, O>
where
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    pub fn new(
        team_repository: Arc<T>,
        subscription_repository: Arc<S>,
        plan_repository: Arc<P>,
        order_repository: Arc<O>,
    ) -> Self {
        Self {
            team_repository,
            subscription_repository,
            plan_repository,
            order_repository,
        }
    }

    async fn owned_team(
        &self,
        user_id: i32,
        team_id: i32,
    ) -> SubscriptionResult<crate::domain::entities::teams::TeamEntity> {
        self.team_repository
            .find_owned_by_user(team_id, user_id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "subscriptions: failed to load team");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, %team_id, "subscriptions: team missing or not owned by caller");
                SubscriptionError::TeamNotFound
            })
    }

    /// Selects a plan for the team: creates the subscription and its opening
    /// order (at the plan's current price) in one transaction.
    pub async fn subscribe(
        &self,
        user_id: i32,
        team_id: i32,
        plan_id: i32,
    ) -> SubscriptionResult<SubscribedModel> {
        info!(%user_id, %team_id, %plan_id, "subscriptions: subscribe requested");

        let team = self.owned_team(user_id, team_id).await?;

        let plan = self
            .plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::PlanNotFound)?;

        // One subscription per team.
        let existing = self
            .subscription_repository
            .find_by_team(team.id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(SubscriptionError::AlreadySubscribed);
        }

        let (subscription_id, order_id) = self
            .subscription_repository
            .subscribe_with_initial_order(
                InsertSubscriptionEntity {
                    plan_id: plan.id,
                    team_id: team.id,
                    is_active: true,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
                plan.price.clone(),
            )
            .await
            .map_err(|err| {
                error!(%team_id, %plan_id, db_error = ?err, "subscriptions: failed to subscribe");
                SubscriptionError::Internal(err)
            })?;

        info!(%subscription_id, %order_id, "subscriptions: team subscribed");
        Ok(SubscribedModel {
            subscription_id,
            order_id,
        })
    }

    /// Business view of the team's subscription: active only while the flag
    /// is set, the latest order is paid, and its 30-day period still runs.
    pub async fn current(
        &self,
        user_id: i32,
        team_id: i32,
    ) -> SubscriptionResult<SubscriptionStatusModel> {
        let team = self.owned_team(user_id, team_id).await?;

        let subscription = self
            .subscription_repository
            .find_by_team(team.id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::NotSubscribed)?;

        let latest = self
            .order_repository
            .find_latest_with_activation(subscription.id)
            .await
            .map_err(|err| {
                error!(subscription_id = %subscription.id, db_error = ?err, "subscriptions: failed to load latest order");
                SubscriptionError::Internal(err)
            })?;

        let (latest_order_id, paid_through) = match &latest {
            Some((order, Some(activation))) => (
                Some(order.id),
                Some(activation.created_at + Duration::days(CYCLE_DAYS)),
            ),
            Some((order, None)) => (Some(order.id), None),
            None => (None, None),
        };

        let is_active = subscription.is_active
            && paid_through.map(|through| through > Utc::now()).unwrap_or(false);

        Ok(SubscriptionStatusModel {
            subscription_id: subscription.id,
            plan_id: subscription.plan_id,
            is_active,
            latest_order_id,
            paid_through,
        })
    }

    /// Appends a renewal order once the latest paid period has elapsed.
    /// Orders are append-only; the previous order is never touched.
    pub async fn renew(&self, user_id: i32, team_id: i32) -> SubscriptionResult<RenewedModel> {
        info!(%user_id, %team_id, "subscriptions: renewal requested");

        let team = self.owned_team(user_id, team_id).await?;

        let subscription = self
            .subscription_repository
            .find_by_team(team.id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::NotSubscribed)?;

        if !subscription.is_active {
            return Err(SubscriptionError::InactiveSubscription);
        }

        let (latest_order, activation) = self
            .order_repository
            .find_latest_with_activation(subscription.id)
            .await
            .map_err(|err| {
                error!(subscription_id = %subscription.id, db_error = ?err, "subscriptions: failed to load latest order");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::InvalidSubscription)?;

        let activation = activation.ok_or(SubscriptionError::UnpaidOrder)?;

        let paid_through = activation.created_at + Duration::days(CYCLE_DAYS);
        if paid_through > Utc::now() {
            return Err(SubscriptionError::PeriodNotElapsed);
        }

        let plan = self
            .plan_repository
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(plan_id = %subscription.plan_id, db_error = ?err, "subscriptions: failed to load plan for renewal");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                SubscriptionError::Internal(anyhow!(
                    "subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        let order = self
            .order_repository
            .create(InsertOrderEntity {
                subscription_id: subscription.id,
                price: plan.price.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(subscription_id = %subscription.id, db_error = ?err, "subscriptions: failed to create renewal order");
                SubscriptionError::Internal(err)
            })?;

        info!(order_id = %order.id, previous_order_id = %latest_order.id, "subscriptions: renewal order created");
        Ok(RenewedModel { order_id: order.id })
    }

    /// Records the payment confirmation for an order. Stands in for the
    /// external payment collaborator; at most one activation per order.
    pub async fn activate_order(&self, order_id: i32) -> SubscriptionResult<()> {
        let order = self
            .order_repository
            .find_by_id(order_id)
            .await
            .map_err(|err| {
                error!(%order_id, db_error = ?err, "subscriptions: failed to load order");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::OrderNotFound)?;

        let existing = self
            .order_repository
            .find_activation_by_order(order.id)
            .await
            .map_err(|err| {
                error!(%order_id, db_error = ?err, "subscriptions: failed to load activation");
                SubscriptionError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(SubscriptionError::AlreadyActivated);
        }

        let activation = self
            .order_repository
            .activate(InsertSubscriptionActivationEntity {
                order_id: order.id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%order_id, db_error = ?err, "subscriptions: failed to activate order");
                SubscriptionError::Internal(err)
            })?;

        info!(%order_id, activation_id = %activation.id, "subscriptions: order activated");
        Ok(())
    }
}
