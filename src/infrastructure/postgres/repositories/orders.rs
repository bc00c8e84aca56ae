use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::orders::{
            InsertOrderEntity, InsertSubscriptionActivationEntity, OrderEntity,
            SubscriptionActivationEntity,
        },
        repositories::orders::OrderRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{orders, subscription_activations},
    },
};

pub struct OrderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderRepository for OrderPostgres {
    async fn find_latest_with_activation(
        &self,
        subscription_id: i32,
    ) -> Result<Option<(OrderEntity, Option<SubscriptionActivationEntity>)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = orders::table
            .left_join(subscription_activations::table)
            .filter(orders::subscription_id.eq(subscription_id))
            .order(orders::id.desc())
            .select((
                OrderEntity::as_select(),
                Option::<SubscriptionActivationEntity>::as_select(),
            ))
            .first::<(OrderEntity, Option<SubscriptionActivationEntity>)>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderEntity::as_select())
            .first::<OrderEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn create(&self, insert_order_entity: InsertOrderEntity) -> Result<OrderEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(orders::table)
            .values(&insert_order_entity)
            .returning(OrderEntity::as_returning())
            .get_result::<OrderEntity>(&mut conn)?;

        Ok(row)
    }

    async fn find_activation_by_order(
        &self,
        order_id: i32,
    ) -> Result<Option<SubscriptionActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscription_activations::table
            .filter(subscription_activations::order_id.eq(order_id))
            .select(SubscriptionActivationEntity::as_select())
            .first::<SubscriptionActivationEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn activate(
        &self,
        insert_activation_entity: InsertSubscriptionActivationEntity,
    ) -> Result<SubscriptionActivationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(subscription_activations::table)
            .values(&insert_activation_entity)
            .returning(SubscriptionActivationEntity::as_returning())
            .get_result::<SubscriptionActivationEntity>(&mut conn)?;

        Ok(row)
    }
}
