use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::user_entity as users;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "joaodriver")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "11987654321")]
    pub phone: String,
    /// Affiliate code of the referrer, if the user arrived via a share link.
    #[schema(example = "JOAO7X2K")]
    pub affiliate_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
    /// Code the new user can immediately share.
    pub affiliate_code: String,
    pub trial_end: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub is_paid: bool,
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial: Option<TrialInfo>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrialInfo {
    pub hours_left: i64,
    pub trial_end: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_model(user: users::Model, has_access: bool, now: DateTime<Utc>) -> Self {
        let trial = match (user.is_trial_active, user.trial_end) {
            (true, Some(end)) if end > now => Some(TrialInfo {
                hours_left: (end - now).num_hours().max(0),
                trial_end: end,
            }),
            _ => None,
        };
        Self {
            id: user.id,
            username: user.username,
            phone: user.phone,
            is_paid: user.is_paid,
            has_access,
            trial,
        }
    }
}
