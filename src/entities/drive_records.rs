use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One per-shift earnings/expense entry. Monetary columns are cents, km and
/// hours_worked are stored in hundredths.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "drive_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub km: i64,
    pub hours_worked: i64,
    pub gross: i64,
    pub uber_earnings: i64,
    pub tips: i64,
    pub fuel: i64,
    pub food: i64,
    pub insurance: i64,
    pub other: i64,
    pub net: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
