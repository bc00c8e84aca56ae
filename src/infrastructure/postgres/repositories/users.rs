use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{
            teams::{InsertTeamEntity, TeamEntity},
            users::{RegisterUserEntity, UserEntity},
        },
        repositories::users::UserRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{teams, users},
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn register_with_personal_team(
        &self,
        register_user_entity: RegisterUserEntity,
    ) -> Result<(i32, i32)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = conn.transaction::<(i32, i32), diesel::result::Error, _>(|conn| {
            let user = insert_into(users::table)
                .values(&register_user_entity)
                .returning(UserEntity::as_returning())
                .get_result::<UserEntity>(conn)?;

            let team = insert_into(teams::table)
                .values(&InsertTeamEntity {
                    name: user.name.clone(),
                    is_personal: true,
                    user_id: user.id,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .returning(TeamEntity::as_returning())
                .get_result::<TeamEntity>(conn)?;

            Ok((user.id, team.id))
        })?;

        Ok(ids)
    }

    async fn find_by_email(&self, email: String) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn find_admin_by_id(&self, user_id: i32) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .filter(users::is_admin.eq(true))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }
}
