use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{
            orders::{InsertOrderEntity, OrderEntity},
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        },
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{orders, subscriptions},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_by_team(&self, team_id: i32) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscriptions::table
            .filter(subscriptions::team_id.eq(team_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn subscribe_with_initial_order(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        order_price: String,
    ) -> Result<(i32, i32)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = conn.transaction::<(i32, i32), diesel::result::Error, _>(|conn| {
            let subscription = insert_into(subscriptions::table)
                .values(&insert_subscription_entity)
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(conn)?;

            let order = insert_into(orders::table)
                .values(&InsertOrderEntity {
                    subscription_id: subscription.id,
                    price: order_price.clone(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .returning(OrderEntity::as_returning())
                .get_result::<OrderEntity>(conn)?;

            Ok((subscription.id, order.id))
        })?;

        Ok(ids)
    }
}
