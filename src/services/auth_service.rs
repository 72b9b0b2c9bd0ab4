use crate::config::AffiliateConfig;
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UserResponse,
};
use crate::services::affiliate_service::AffiliateService;
use crate::utils::{hash_password, validate_password, verify_password};
use crate::utils::jwt::JwtService;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt: JwtService,
    affiliates: AffiliateService,
    settings: AffiliateConfig,
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt: JwtService,
        affiliates: AffiliateService,
        settings: AffiliateConfig,
    ) -> Self {
        Self {
            pool,
            jwt,
            affiliates,
            settings,
        }
    }

    /// Creates the account, starts the free trial, provisions the affiliate
    /// profile and credits the referrer when a valid code was supplied.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let username = request.username.trim().to_lowercase();
        let phone = normalize_phone(&request.phone)?;

        if username.len() < 3 || username.len() > 30 {
            return Err(AppError::ValidationError(
                "Username must be between 3 and 30 characters".to_string(),
            ));
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppError::ValidationError(
                "Username may contain only letters, digits and underscores".to_string(),
            ));
        }
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username.clone()))
                    .add(users::Column::Phone.eq(phone.clone())),
            )
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Username or phone already registered".to_string(),
            ));
        }

        let referred_by = match request.affiliate_code.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                let code = code.trim().to_uppercase();
                // Unknown codes are dropped silently so a stale share link
                // never blocks signup.
                match self.affiliates.find_by_code(&code).await? {
                    Some(_) => Some(code),
                    None => {
                        log::warn!("Signup with unknown affiliate code {code}");
                        None
                    }
                }
            }
            _ => None,
        };

        let now = Utc::now();
        let trial_end = now + Duration::hours(self.settings.trial_hours);

        let user = users::ActiveModel {
            username: Set(username),
            phone: Set(phone),
            password_hash: Set(hash_password(&request.password)?),
            is_paid: Set(false),
            trial_start: Set(Some(now)),
            trial_end: Set(Some(trial_end)),
            is_trial_active: Set(true),
            referred_by: Set(referred_by.clone()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let affiliate = self.affiliates.create_profile(&user).await?;

        if let Some(code) = referred_by {
            self.affiliates.credit_referral(&code, now).await?;
        }

        log::info!("Registered user {} ({})", user.username, user.id);

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id, &user.username)?;

        Ok(RegisterResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt.get_access_token_expires_in(),
            user: UserResponse::from_model(user, true, now),
            affiliate_code: affiliate.affiliate_code,
            trial_end,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim().to_lowercase();

        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now();
        let user = self.refresh_trial_flag(user, now).await?;
        let has_access = has_access(&user, now);

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt.get_access_token_expires_in(),
            user: UserResponse::from_model(user, has_access, now),
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        let now = Utc::now();
        let user = self.refresh_trial_flag(user, now).await?;
        let has_access = has_access(&user, now);

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt.get_access_token_expires_in(),
            user: UserResponse::from_model(user, has_access, now),
        })
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<users::Model> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.refresh_trial_flag(user, Utc::now()).await
    }

    pub async fn current_user(&self, user_id: i64) -> AppResult<UserResponse> {
        let now = Utc::now();
        let user = self.get_user(user_id).await?;
        let has_access = has_access(&user, now);
        Ok(UserResponse::from_model(user, has_access, now))
    }

    /// Clears is_trial_active once the window has elapsed, so later reads
    /// don't have to re-derive it.
    async fn refresh_trial_flag(
        &self,
        user: users::Model,
        now: chrono::DateTime<Utc>,
    ) -> AppResult<users::Model> {
        let expired = user.is_trial_active && user.trial_end.is_none_or(|end| end <= now);
        if !expired {
            return Ok(user);
        }

        let mut model = user.into_active_model();
        model.is_trial_active = Set(false);
        model.updated_at = Set(Some(now));
        Ok(model.update(&self.pool).await?)
    }
}

/// Paid subscribers always have access; trial users only until trial_end.
pub fn has_access(user: &users::Model, now: chrono::DateTime<Utc>) -> bool {
    if user.is_paid {
        return true;
    }
    user.is_trial_active && user.trial_end.is_some_and(|end| end > now)
}

fn normalize_phone(raw: &str) -> AppResult<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 || digits.len() > 13 {
        return Err(AppError::ValidationError(
            "Phone must have between 10 and 13 digits".to_string(),
        ));
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_paid: bool, is_trial_active: bool, trial_hours_left: i64) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: 1,
            username: "joao".to_string(),
            phone: "11987654321".to_string(),
            password_hash: "x".to_string(),
            is_paid,
            payment_id: None,
            payment_status: None,
            trial_start: Some(now - Duration::hours(48 - trial_hours_left)),
            trial_end: Some(now + Duration::hours(trial_hours_left)),
            is_trial_active,
            referred_by: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    #[test]
    fn test_paid_user_always_has_access() {
        assert!(has_access(&user(true, false, -10), Utc::now()));
    }

    #[test]
    fn test_trial_user_has_access_until_end() {
        assert!(has_access(&user(false, true, 5), Utc::now()));
        assert!(!has_access(&user(false, true, -1), Utc::now()));
    }

    #[test]
    fn test_inactive_trial_denies_access() {
        assert!(!has_access(&user(false, false, 5), Utc::now()));
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("(11) 98765-4321").unwrap(), "11987654321");
        assert!(normalize_phone("123").is_err());
        assert!(normalize_phone("12345678901234567").is_err());
    }
}
