use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "affiliates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub affiliate_code: String,
    /// Denormalized count of users whose referred_by equals affiliate_code.
    pub total_referrals: i64,
    pub level: i32,
    pub experience: i64,
    pub streak: i64,
    pub last_referral_date: Option<DateTime<Utc>>,
    /// Append-only set of earned badge ids, persisted as a JSON array.
    pub badges: Json,
    pub withdrawal_key: Option<String>,
    pub custom_slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn badge_ids(&self) -> Vec<String> {
        self.badges
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
