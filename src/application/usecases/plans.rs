use std::sync::Arc;

use anyhow::anyhow;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    repositories::{
        orders::OrderRepository, plans::PlanRepository, subscriptions::SubscriptionRepository,
        teams::TeamRepository,
    },
    value_objects::plans::{CreatePlanModel, PlanModel, SuccessResponse, UpdatePlanModel},
};

/// Billing cycles are treated as 30 days across the board, for yearly plans
/// included. Known simplification, kept on purpose.
pub const CYCLE_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("not found")]
    PlanNotFound,
    #[error("team not found")]
    TeamNotFound,
    #[error("This team is not subscribe.")]
    NotSubscribed,
    #[error("There is no active subscription for the given team.")]
    InactiveSubscription,
    #[error("cant upgrade to the same plan.")]
    SamePlan,
    #[error("cant upgrade to plan less than the current plan.")]
    NotAnUpgrade,
    #[error("invalid subscription.")]
    InvalidSubscription,
    #[error("not payed.")]
    UnpaidOrder,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlanError::PlanNotFound | PlanError::TeamNotFound => StatusCode::NOT_FOUND,
            PlanError::NotSubscribed
            | PlanError::InactiveSubscription
            | PlanError::SamePlan
            | PlanError::NotAnUpgrade
            | PlanError::InvalidSubscription
            | PlanError::UnpaidOrder => StatusCode::BAD_REQUEST,
            PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

pub struct PlanUseCase<P, T, S, O>
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    plan_repository: Arc<P>,
    team_repository: Arc<T>,
    subscription_repository: Arc<S>,
    order_repository: Arc<O>,
}

impl<P, T, S, O> PlanUseCase<P, T, S, O>
where
    P: PlanRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    pub fn new(
        plan_repository: Arc<P>,
        team_repository: Arc<T>,
        subscription_repository: Arc<S>,
        order_repository: Arc<O>,
    ) -> Self {
        Self {
            plan_repository,
            team_repository,
            subscription_repository,
            order_repository,
        }
    }

    pub async fn get_one(&self, plan_id: i32) -> PlanResult<PlanModel> {
        let plan = self
            .plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to load plan");
                PlanError::Internal(err)
            })?
            .ok_or(PlanError::PlanNotFound)?;

        Ok(PlanModel::from(plan))
    }

    /// Storage errors are swallowed here: the catalogue degrades to an
    /// empty list rather than surfacing an error to the client.
    pub async fn list(&self) -> Vec<PlanModel> {
        match self.plan_repository.list().await {
            Ok(plans) => plans.into_iter().map(PlanModel::from).collect(),
            Err(err) => {
                error!(db_error = ?err, "plans: failed to list plans, returning empty list");
                Vec::new()
            }
        }
    }

    /// Admin mutation. Failures degrade to `{success: false}` instead of an
    /// error response; the admin UI only wants a flag.
    pub async fn create(&self, create_plan_model: CreatePlanModel) -> SuccessResponse {
        let name = create_plan_model.name;
        match self
            .plan_repository
            .create(create_plan_model.to_entity())
            .await
        {
            Ok(plan) => {
                info!(plan_id = %plan.id, %name, "plans: plan created");
                SuccessResponse { success: true }
            }
            Err(err) => {
                error!(%name, db_error = ?err, "plans: failed to create plan");
                SuccessResponse { success: false }
            }
        }
    }

    pub async fn update(&self, plan_id: i32, update_plan_model: UpdatePlanModel) -> SuccessResponse {
        match self
            .plan_repository
            .update(plan_id, update_plan_model.to_entity())
            .await
        {
            Ok(()) => {
                info!(%plan_id, "plans: plan updated");
                SuccessResponse { success: true }
            }
            Err(err) => {
                error!(%plan_id, db_error = ?err, "plans: failed to update plan");
                SuccessResponse { success: false }
            }
        }
    }

    /// Prorated charge for switching the team's active subscription to a more
    /// expensive plan mid-cycle. Read-only: nothing is committed here.
    ///
    /// The preconditions short-circuit in order; the first violated one wins.
    /// An already-elapsed cycle is accepted and quotes a zero or negative
    /// charge.
    pub async fn upgrade(&self, user_id: i32, team_id: i32, plan_id: i32) -> PlanResult<i64> {
        info!(%user_id, %team_id, %plan_id, "plans: upgrade quote requested");

        let target_plan = self
            .plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to load target plan");
                PlanError::Internal(err)
            })?
            .ok_or(PlanError::PlanNotFound)?;

        let team = self
            .team_repository
            .find_owned_by_user(team_id, user_id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "plans: failed to load team");
                PlanError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, %team_id, "plans: team missing or not owned by caller");
                PlanError::TeamNotFound
            })?;

        let subscription = self
            .subscription_repository
            .find_by_team(team.id)
            .await
            .map_err(|err| {
                error!(%team_id, db_error = ?err, "plans: failed to load subscription");
                PlanError::Internal(err)
            })?
            .ok_or(PlanError::NotSubscribed)?;

        if !subscription.is_active {
            return Err(PlanError::InactiveSubscription);
        }

        let current_plan = self
            .plan_repository
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(plan_id = %subscription.plan_id, db_error = ?err, "plans: failed to load current plan");
                PlanError::Internal(err)
            })?
            .ok_or_else(|| {
                PlanError::Internal(anyhow!(
                    "subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        if current_plan.id == target_plan.id {
            return Err(PlanError::SamePlan);
        }

        // Numeric comparison on the decimal text, never lexicographic.
        let current_price = parse_price(&current_plan.price)?;
        let target_price = parse_price(&target_plan.price)?;

        if target_price <= current_price {
            return Err(PlanError::NotAnUpgrade);
        }

        let (latest_order, activation) = self
            .order_repository
            .find_latest_with_activation(subscription.id)
            .await
            .map_err(|err| {
                error!(subscription_id = %subscription.id, db_error = ?err, "plans: failed to load latest order");
                PlanError::Internal(err)
            })?
            .ok_or(PlanError::InvalidSubscription)?;

        let activation = activation.ok_or(PlanError::UnpaidOrder)?;

        let cycle_end = activation.created_at + Duration::days(CYCLE_DAYS);
        let remaining_days = (cycle_end - Utc::now()).num_days();
        let price_difference = target_price - current_price;
        let charge = (price_difference / CYCLE_DAYS as f64 * remaining_days as f64).ceil() as i64;

        info!(
            %user_id,
            %team_id,
            order_id = %latest_order.id,
            %remaining_days,
            %charge,
            "plans: upgrade quote computed"
        );

        Ok(charge)
    }
}

fn parse_price(raw: &str) -> PlanResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PlanError::Internal(anyhow!("malformed plan price: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            orders::{OrderEntity, SubscriptionActivationEntity},
            plans::PlanEntity,
            subscriptions::SubscriptionEntity,
            teams::TeamEntity,
        },
        repositories::{
            orders::MockOrderRepository, plans::MockPlanRepository,
            subscriptions::MockSubscriptionRepository, teams::MockTeamRepository,
        },
        value_objects::plans::PlanName,
    };
    use chrono::{DateTime, Utc};

    const USER_ID: i32 = 7;
    const TEAM_ID: i32 = 3;

    fn plan(id: i32, name: &str, price: &str) -> PlanEntity {
        PlanEntity {
            id,
            name: name.to_string(),
            price: price.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(id: i32, user_id: i32) -> TeamEntity {
        TeamEntity {
            id,
            name: "squad".to_string(),
            is_personal: true,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subscription(id: i32, plan_id: i32, team_id: i32, is_active: bool) -> SubscriptionEntity {
        SubscriptionEntity {
            id,
            plan_id,
            team_id,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn order(id: i32, subscription_id: i32) -> OrderEntity {
        OrderEntity {
            id,
            subscription_id,
            price: "20".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn activation(order_id: i32, created_at: DateTime<Utc>) -> SubscriptionActivationEntity {
        SubscriptionActivationEntity {
            id: 1,
            order_id,
            created_at,
            updated_at: created_at,
        }
    }

    // A small head start keeps whole-day truncation stable while the test runs.
    fn activated_days_ago(days: i64) -> DateTime<Utc> {
        Utc::now() - Duration::days(days) + Duration::seconds(30)
    }

    struct Mocks {
        plans: MockPlanRepository,
        teams: MockTeamRepository,
        subscriptions: MockSubscriptionRepository,
        orders: MockOrderRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                plans: MockPlanRepository::new(),
                teams: MockTeamRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                orders: MockOrderRepository::new(),
            }
        }

        fn into_usecase(
            self,
        ) -> PlanUseCase<
            MockPlanRepository,
            MockTeamRepository,
            MockSubscriptionRepository,
            MockOrderRepository,
        > {
            PlanUseCase::new(
                Arc::new(self.plans),
                Arc::new(self.teams),
                Arc::new(self.subscriptions),
                Arc::new(self.orders),
            )
        }
    }

    /// Wires the happy path up to the latest order: plan 1 ("20") is the
    /// current plan, plan 2 ("50") the target, team owned by USER_ID with an
    /// active paid subscription.
    fn paid_upgrade_mocks(activated_at: DateTime<Utc>) -> Mocks {
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|id| {
            Ok(match id {
                1 => Some(plan(1, "month", "20")),
                2 => Some(plan(2, "month", "50")),
                _ => None,
            })
        });
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|team_id, user_id| {
                Ok((team_id == TEAM_ID && user_id == USER_ID).then(|| team(TEAM_ID, USER_ID)))
            });
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(Some(subscription(11, 1, TEAM_ID, true))));
        mocks
            .orders
            .expect_find_latest_with_activation()
            .returning(move |_| Ok(Some((order(21, 11), Some(activation(21, activated_at))))));
        mocks
    }

    #[tokio::test]
    async fn get_one_returns_plan() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_find_by_id()
            .returning(|_| Ok(Some(plan(1, "month", "100"))));

        let found = mocks.into_usecase().get_one(1).await.unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(found.name, "month");
        assert_eq!(found.price, "100");
    }

    #[tokio::test]
    async fn get_one_unknown_plan_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks.into_usecase().get_one(999).await;
        assert!(matches!(result, Err(PlanError::PlanNotFound)));
    }

    #[tokio::test]
    async fn list_swallows_storage_errors() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_list()
            .returning(|| Err(anyhow!("connection refused")));

        assert!(mocks.into_usecase().list().await.is_empty());
    }

    #[tokio::test]
    async fn create_reports_success_flag() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_create()
            .withf(|entity| entity.name == "month" && entity.price == "50")
            .returning(|entity| {
                Ok(PlanEntity {
                    id: 1,
                    name: entity.name,
                    price: entity.price,
                    created_at: entity.created_at,
                    updated_at: entity.updated_at,
                })
            });

        let response = mocks
            .into_usecase()
            .create(CreatePlanModel {
                name: PlanName::Month,
                price: 50.0,
            })
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn create_swallows_storage_errors() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_create()
            .returning(|_| Err(anyhow!("unique violation")));

        let response = mocks
            .into_usecase()
            .create(CreatePlanModel {
                name: PlanName::Year,
                price: 200.0,
            })
            .await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn update_swallows_storage_errors() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_update()
            .returning(|_, _| Err(anyhow!("connection refused")));

        let response = mocks
            .into_usecase()
            .update(
                1,
                UpdatePlanModel {
                    name: PlanName::Month,
                    price: 75.0,
                },
            )
            .await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn upgrade_unknown_plan_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 999).await;
        assert!(matches!(result, Err(PlanError::PlanNotFound)));
    }

    #[tokio::test]
    async fn upgrade_foreign_team_is_team_not_found() {
        let mocks = paid_upgrade_mocks(activated_days_ago(0));

        // Team 3 exists but belongs to USER_ID, not to user 99.
        let result = mocks.into_usecase().upgrade(99, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::TeamNotFound)));
    }

    #[tokio::test]
    async fn upgrade_unsubscribed_team_is_bad_request() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_find_by_id()
            .returning(|_| Ok(Some(plan(2, "month", "50"))));
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|_, _| Ok(Some(team(TEAM_ID, USER_ID))));
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(None));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::NotSubscribed)));
        assert_eq!(
            PlanError::NotSubscribed.to_string(),
            "This team is not subscribe."
        );
    }

    #[tokio::test]
    async fn upgrade_inactive_subscription_is_rejected() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_find_by_id()
            .returning(|_| Ok(Some(plan(2, "month", "50"))));
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|_, _| Ok(Some(team(TEAM_ID, USER_ID))));
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(Some(subscription(11, 1, TEAM_ID, false))));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::InactiveSubscription)));
    }

    #[tokio::test]
    async fn upgrade_to_same_plan_is_rejected() {
        let mocks = paid_upgrade_mocks(activated_days_ago(0));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 1).await;
        assert!(matches!(result, Err(PlanError::SamePlan)));
    }

    #[tokio::test]
    async fn downgrade_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|id| {
            Ok(match id {
                1 => Some(plan(1, "month", "50")),
                2 => Some(plan(2, "month", "20")),
                _ => None,
            })
        });
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|_, _| Ok(Some(team(TEAM_ID, USER_ID))));
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(Some(subscription(11, 1, TEAM_ID, true))));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::NotAnUpgrade)));
    }

    #[tokio::test]
    async fn equal_price_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|id| {
            Ok(match id {
                1 => Some(plan(1, "month", "50")),
                2 => Some(plan(2, "year", "50")),
                _ => None,
            })
        });
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|_, _| Ok(Some(team(TEAM_ID, USER_ID))));
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(Some(subscription(11, 1, TEAM_ID, true))));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::NotAnUpgrade)));
    }

    #[tokio::test]
    async fn price_comparison_is_numeric_not_lexicographic() {
        // "9" > "100" lexicographically; numerically it is an upgrade.
        let mut mocks = Mocks::new();
        mocks.plans.expect_find_by_id().returning(|id| {
            Ok(match id {
                1 => Some(plan(1, "month", "9")),
                2 => Some(plan(2, "year", "100")),
                _ => None,
            })
        });
        mocks
            .teams
            .expect_find_owned_by_user()
            .returning(|_, _| Ok(Some(team(TEAM_ID, USER_ID))));
        mocks
            .subscriptions
            .expect_find_by_team()
            .returning(|_| Ok(Some(subscription(11, 1, TEAM_ID, true))));
        let activated_at = activated_days_ago(0);
        mocks
            .orders
            .expect_find_latest_with_activation()
            .returning(move |_| Ok(Some((order(21, 11), Some(activation(21, activated_at))))));

        let charge = mocks
            .into_usecase()
            .upgrade(USER_ID, TEAM_ID, 2)
            .await
            .unwrap();
        assert_eq!(charge, 91);
    }

    #[tokio::test]
    async fn upgrade_without_any_order_is_invalid_subscription() {
        let mut mocks = paid_upgrade_mocks(activated_days_ago(0));
        mocks.orders.checkpoint();
        mocks
            .orders
            .expect_find_latest_with_activation()
            .returning(|_| Ok(None));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::InvalidSubscription)));
    }

    #[tokio::test]
    async fn upgrade_with_unpaid_order_is_rejected() {
        let mut mocks = paid_upgrade_mocks(activated_days_ago(0));
        mocks.orders.checkpoint();
        mocks
            .orders
            .expect_find_latest_with_activation()
            .returning(|_| Ok(Some((order(21, 11), None))));

        let result = mocks.into_usecase().upgrade(USER_ID, TEAM_ID, 2).await;
        assert!(matches!(result, Err(PlanError::UnpaidOrder)));
        assert_eq!(PlanError::UnpaidOrder.to_string(), "not payed.");
    }

    #[tokio::test]
    async fn just_activated_upgrade_charges_the_full_delta() {
        // ceil((50 - 20) / 30 * 30) = 30
        let mocks = paid_upgrade_mocks(activated_days_ago(0));

        let charge = mocks
            .into_usecase()
            .upgrade(USER_ID, TEAM_ID, 2)
            .await
            .unwrap();
        assert_eq!(charge, 30);
    }

    #[tokio::test]
    async fn charge_shrinks_as_the_cycle_burns_down() {
        let mid_cycle = paid_upgrade_mocks(activated_days_ago(15))
            .into_usecase()
            .upgrade(USER_ID, TEAM_ID, 2)
            .await
            .unwrap();
        let fresh = paid_upgrade_mocks(activated_days_ago(0))
            .into_usecase()
            .upgrade(USER_ID, TEAM_ID, 2)
            .await
            .unwrap();

        assert_eq!(mid_cycle, 15);
        assert!(mid_cycle < fresh);
    }

    #[tokio::test]
    async fn elapsed_cycle_quotes_a_non_positive_charge() {
        let mocks = paid_upgrade_mocks(activated_days_ago(45));

        let charge = mocks
            .into_usecase()
            .upgrade(USER_ID, TEAM_ID, 2)
            .await
            .unwrap();
        assert!(charge <= 0);
    }
}
