use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeModel {
    pub team_id: i32,
    pub plan_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenewModel {
    pub team_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentSubscriptionQuery {
    pub team_id: i32,
}

/// Business view of a team's subscription: active means the latest order is
/// paid and its 30-day period has not elapsed.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusModel {
    pub subscription_id: i32,
    pub plan_id: i32,
    pub is_active: bool,
    pub latest_order_id: Option<i32>,
    pub paid_through: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribedModel {
    pub subscription_id: i32,
    pub order_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewedModel {
    pub order_id: i32,
}
