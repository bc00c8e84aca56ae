use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: i32) -> Result<Option<PlanEntity>>;
    async fn list(&self) -> Result<Vec<PlanEntity>>;
    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
    async fn update(&self, plan_id: i32, update_plan_entity: UpdatePlanEntity) -> Result<()>;
}
