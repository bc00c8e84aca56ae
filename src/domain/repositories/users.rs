use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{RegisterUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    /// Creates the user and their personal team in one transaction.
    /// Returns `(user_id, team_id)`.
    async fn register_with_personal_team(
        &self,
        register_user_entity: RegisterUserEntity,
    ) -> Result<(i32, i32)>;
    async fn find_by_email(&self, email: String) -> Result<Option<UserEntity>>;
    /// Returns the user only when the administrative flag is set.
    async fn find_admin_by_id(&self, user_id: i32) -> Result<Option<UserEntity>>;
}
