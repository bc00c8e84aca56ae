use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::teams::{InsertTeamEntity, TeamEntity},
        repositories::teams::TeamRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::teams},
};

pub struct TeamPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TeamPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TeamRepository for TeamPostgres {
    async fn create(&self, insert_team_entity: InsertTeamEntity) -> Result<TeamEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(teams::table)
            .values(&insert_team_entity)
            .returning(TeamEntity::as_returning())
            .get_result::<TeamEntity>(&mut conn)?;

        Ok(row)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<TeamEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = teams::table
            .filter(teams::user_id.eq(user_id))
            .order(teams::id.asc())
            .select(TeamEntity::as_select())
            .load::<TeamEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn find_owned_by_user(&self, team_id: i32, user_id: i32) -> Result<Option<TeamEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = teams::table
            .filter(teams::id.eq(team_id))
            .filter(teams::user_id.eq(user_id))
            .select(TeamEntity::as_select())
            .first::<TeamEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }
}
