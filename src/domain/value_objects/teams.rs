use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::teams::{InsertTeamEntity, TeamEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamModel {
    pub id: i32,
    pub name: String,
    pub is_personal: bool,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamEntity> for TeamModel {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            is_personal: entity.is_personal,
            user_id: entity.user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertTeamModel {
    pub name: String,
}

impl InsertTeamModel {
    pub fn to_entity(&self, user_id: i32) -> InsertTeamEntity {
        InsertTeamEntity {
            name: self.name.clone(),
            is_personal: false,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
