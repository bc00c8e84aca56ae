use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};

/// Billing-cycle kind. Deserialization rejects anything outside the
/// enumeration, so an invalid name never reaches a handler body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanName {
    Month,
    Year,
}

impl fmt::Display for PlanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanName::Month => write!(f, "month"),
            PlanName::Year => write!(f, "year"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModel {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanModel {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanModel {
    pub name: PlanName,
    pub price: f64,
}

impl CreatePlanModel {
    pub fn to_entity(&self) -> InsertPlanEntity {
        InsertPlanEntity {
            name: self.name.to_string(),
            price: format!("{}", self.price.round()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanModel {
    pub name: PlanName,
    pub price: f64,
}

impl UpdatePlanModel {
    pub fn to_entity(&self) -> UpdatePlanEntity {
        UpdatePlanEntity {
            name: self.name.to_string(),
            price: format!("{}", self.price.round()),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeQuoteModel {
    pub plan_id: i32,
    pub team_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_name_deserializes_known_kinds() {
        let model: CreatePlanModel =
            serde_json::from_str(r#"{"name":"month","price":50}"#).unwrap();
        assert_eq!(model.name, PlanName::Month);

        let model: CreatePlanModel =
            serde_json::from_str(r#"{"name":"year","price":200}"#).unwrap();
        assert_eq!(model.name, PlanName::Year);
    }

    // An unknown plan name must fail deserialization outright, never reach a
    // handler and never degrade to a success flag.
    #[test]
    fn test_unknown_plan_name_is_rejected() {
        let result = serde_json::from_str::<CreatePlanModel>(r#"{"name":"week","price":50}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<UpdatePlanModel>(r#"{"name":"Month","price":50}"#);
        assert!(result.is_err());
    }
}
