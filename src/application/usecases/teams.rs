use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::{
    repositories::teams::TeamRepository,
    value_objects::teams::{InsertTeamModel, TeamModel},
};

pub struct TeamUseCase<T>
where
    T: TeamRepository + Send + Sync + 'static,
{
    team_repository: Arc<T>,
}

impl<T> TeamUseCase<T>
where
    T: TeamRepository + Send + Sync + 'static,
{
    pub fn new(team_repository: Arc<T>) -> Self {
        Self { team_repository }
    }

    pub async fn create(&self, user_id: i32, insert_team_model: InsertTeamModel) -> Result<TeamModel> {
        let team = self
            .team_repository
            .create(insert_team_model.to_entity(user_id))
            .await?;

        info!(team_id = %team.id, %user_id, "teams: team created");
        Ok(TeamModel::from(team))
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<TeamModel>> {
        let teams = self.team_repository.list_by_user(user_id).await?;
        Ok(teams.into_iter().map(TeamModel::from).collect())
    }
}
