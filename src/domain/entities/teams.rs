use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::teams;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = teams)]
pub struct TeamEntity {
    pub id: i32,
    pub name: String,
    pub is_personal: bool,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct InsertTeamEntity {
    pub name: String,
    pub is_personal: bool,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
