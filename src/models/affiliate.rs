use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AffiliateProgress {
    pub level: i32,
    pub experience: i64,
    pub next_level_xp: i64,
    pub progress_percent: i64,
    pub badges: Vec<String>,
    pub new_badges: Vec<String>,
    pub streak: i64,
    /// Sum of paid commissions, in cents.
    pub total_earnings: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AffiliateStatsResponse {
    pub affiliate_code: String,
    pub total_referrals: i64,
    pub total_earnings: i64,
    pub pending_earnings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_key: Option<String>,
    pub affiliate_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub earned: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeCatalogResponse {
    pub badges: Vec<BadgeInfo>,
    pub earned_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalKeyRequest {
    #[schema(example = "joao@example.com")]
    pub withdrawal_key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawResponse {
    pub amount: i64,
    pub transaction_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomLinkRequest {
    #[schema(example = "joao-indica")]
    pub custom_slug: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomLinkResponse {
    pub custom_slug: String,
    pub custom_link: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SharingLinksResponse {
    pub affiliate_code: String,
    pub automatic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    pub whatsapp: String,
    pub telegram: String,
}
