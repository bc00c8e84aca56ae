use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::orders::{
    InsertOrderEntity, InsertSubscriptionActivationEntity, OrderEntity,
    SubscriptionActivationEntity,
};

#[automock]
#[async_trait]
pub trait OrderRepository {
    /// Latest order for the subscription (highest id) together with its
    /// activation, if the order has been paid.
    async fn find_latest_with_activation(
        &self,
        subscription_id: i32,
    ) -> Result<Option<(OrderEntity, Option<SubscriptionActivationEntity>)>>;
    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderEntity>>;
    async fn create(&self, insert_order_entity: InsertOrderEntity) -> Result<OrderEntity>;
    async fn find_activation_by_order(
        &self,
        order_id: i32,
    ) -> Result<Option<SubscriptionActivationEntity>>;
    async fn activate(
        &self,
        insert_activation_entity: InsertSubscriptionActivationEntity,
    ) -> Result<SubscriptionActivationEntity>;
}
