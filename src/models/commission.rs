use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{commission_entity as commissions, CommissionStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommissionResponse {
    pub id: i64,
    pub payment_id: String,
    pub commission_amount: i64,
    pub subscription_value: i64,
    pub status: CommissionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<commissions::Model> for CommissionResponse {
    fn from(m: commissions::Model) -> Self {
        Self {
            id: m.id,
            payment_id: m.payment_id,
            commission_amount: m.commission_amount,
            subscription_value: m.subscription_value,
            status: m.status,
            paid_at: m.paid_at,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionStatusResponse {
    pub is_paid: bool,
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial: Option<crate::models::TrialInfo>,
}

/// Provider callback body. Field names vary between provider versions, so
/// the id accepts both spellings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PixWebhookPayload {
    #[serde(alias = "payment_id")]
    pub id: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionResponse {
    pub payment_id: String,
    pub payment_link: Option<String>,
    pub qr_code: Option<String>,
    pub value: i64,
    pub has_affiliate: bool,
}
