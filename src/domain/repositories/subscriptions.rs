use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn find_by_team(&self, team_id: i32) -> Result<Option<SubscriptionEntity>>;
    /// Creates the subscription and its first order in one transaction, so
    /// a subscription is never observable without its opening order.
    /// Returns `(subscription_id, order_id)`.
    async fn subscribe_with_initial_order(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        order_price: String,
    ) -> Result<(i32, i32)>;
}
