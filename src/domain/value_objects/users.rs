use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::RegisterUserEntity;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub email: String,
    pub password: String,
    pub name: String,
    pub locale: String,
    pub timezone: Option<String>,
}

impl RegisterUserModel {
    pub fn to_entity(&self, password_hash: String) -> RegisterUserEntity {
        RegisterUserEntity {
            email: self.email.clone(),
            name: self.name.clone(),
            password_hash,
            email_verified: true,
            is_admin: false,
            locale: self.locale.clone(),
            timezone: self.timezone.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredModel {
    pub team_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedInModel {
    pub user_id: i32,
}
