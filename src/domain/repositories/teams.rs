use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::teams::{InsertTeamEntity, TeamEntity};

#[automock]
#[async_trait]
pub trait TeamRepository {
    async fn create(&self, insert_team_entity: InsertTeamEntity) -> Result<TeamEntity>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<TeamEntity>>;
    /// Ownership is part of the lookup: a team that exists but belongs to
    /// another user is indistinguishable from a missing one.
    async fn find_owned_by_user(&self, team_id: i32, user_id: i32) -> Result<Option<TeamEntity>>;
}
