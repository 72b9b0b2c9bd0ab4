use crate::config::AffiliateConfig;
use crate::entities::{affiliate_entity as affiliates, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::PixService;
use crate::models::{
    AffiliateProgress, AffiliateStatsResponse, BadgeCatalogResponse, BadgeInfo, CustomLinkResponse,
    SharingLinksResponse, WithdrawResponse,
};
use crate::services::commission_service::CommissionService;
use crate::utils::generate_affiliate_code;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

/// XP needed to enter each level, index 0 = level 1.
const LEVEL_REQUIREMENTS: [i64; 10] = [0, 100, 250, 500, 1000, 2000, 4000, 8000, 15000, 30000];

pub const MAX_LEVEL: i32 = 10;

pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const BADGES: [Badge; 9] = [
    Badge {
        id: "first_referral",
        name: "First Referral",
        icon: "🎯",
        description: "Your first successful referral",
    },
    Badge {
        id: "streak_3",
        name: "3-Day Streak",
        icon: "🔥",
        description: "Referrals on 3 consecutive days",
    },
    Badge {
        id: "streak_7",
        name: "Perfect Week",
        icon: "⚡",
        description: "Referrals on 7 consecutive days",
    },
    Badge {
        id: "level_5",
        name: "Seasoned Affiliate",
        icon: "⭐",
        description: "Reached level 5",
    },
    Badge {
        id: "level_10",
        name: "Master Affiliate",
        icon: "👑",
        description: "Reached the maximum level",
    },
    Badge {
        id: "referrals_10",
        name: "Recruiter",
        icon: "👥",
        description: "10 total referrals",
    },
    Badge {
        id: "referrals_50",
        name: "Influencer",
        icon: "🌟",
        description: "50 total referrals",
    },
    Badge {
        id: "earnings_100",
        name: "First Hundred",
        icon: "💰",
        description: "R$ 100 in commissions",
    },
    Badge {
        id: "earnings_500",
        name: "Entrepreneur",
        icon: "💎",
        description: "R$ 500 in commissions",
    },
];

/// Experience from referrals, streak and paid earnings (cents). The earnings
/// component is floor(earnings_in_reais * 2), hence cents / 50.
pub fn experience_points(total_referrals: i64, streak: i64, paid_earnings: i64) -> i64 {
    total_referrals * 50 + paid_earnings / 50 + streak * 25
}

/// Highest level whose threshold is <= xp, searched from the top down.
pub fn level_for_xp(xp: i64) -> i32 {
    for level in (1..=MAX_LEVEL).rev() {
        if xp >= LEVEL_REQUIREMENTS[(level - 1) as usize] {
            return level;
        }
    }
    1
}

pub fn next_level_xp(level: i32) -> i64 {
    let next = level.saturating_add(1).min(MAX_LEVEL);
    LEVEL_REQUIREMENTS[(next - 1) as usize]
}

pub fn progress_percent(xp: i64, level: i32) -> i64 {
    if level >= MAX_LEVEL {
        return 100;
    }
    let current = LEVEL_REQUIREMENTS[(level - 1) as usize];
    let next = LEVEL_REQUIREMENTS[level as usize];
    (xp - current) * 100 / (next - current)
}

/// Badge predicates in fixed order, each skipped when already held. Several
/// badges can be earned in one evaluation.
pub fn evaluate_badges(
    current: &[String],
    total_referrals: i64,
    streak: i64,
    level: i32,
    paid_earnings: i64,
) -> Vec<String> {
    let has = |id: &str| current.iter().any(|b| b == id);
    let mut earned = Vec::new();

    if total_referrals >= 1 && !has("first_referral") {
        earned.push("first_referral".to_string());
    }
    if streak >= 3 && !has("streak_3") {
        earned.push("streak_3".to_string());
    }
    if streak >= 7 && !has("streak_7") {
        earned.push("streak_7".to_string());
    }
    if level >= 5 && !has("level_5") {
        earned.push("level_5".to_string());
    }
    if level >= 10 && !has("level_10") {
        earned.push("level_10".to_string());
    }
    if total_referrals >= 10 && !has("referrals_10") {
        earned.push("referrals_10".to_string());
    }
    if total_referrals >= 50 && !has("referrals_50") {
        earned.push("referrals_50".to_string());
    }
    if paid_earnings >= 10_000 && !has("earnings_100") {
        earned.push("earnings_100".to_string());
    }
    if paid_earnings >= 50_000 && !has("earnings_500") {
        earned.push("earnings_500".to_string());
    }

    earned
}

/// Consecutive-day streak transition. The day delta is the floor division of
/// elapsed milliseconds, matching production behavior: two events 23h59m
/// apart on different calendar days still count as the same day, and the
/// boundary shifts with DST. Kept as-is rather than switching to calendar
/// dates.
pub fn next_streak(streak: i64, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(last) = last else {
        return 1;
    };
    let day_delta = (now - last).num_milliseconds().div_euclid(86_400_000);
    match day_delta {
        0 => streak,
        1 => streak + 1,
        _ => 1, // gap or clock skew resets
    }
}

#[derive(Clone)]
pub struct AffiliateService {
    pool: DatabaseConnection,
    commissions: CommissionService,
    pix: PixService,
    base_url: String,
    settings: AffiliateConfig,
}

impl AffiliateService {
    pub fn new(
        pool: DatabaseConnection,
        commissions: CommissionService,
        pix: PixService,
        base_url: String,
        settings: AffiliateConfig,
    ) -> Self {
        Self {
            pool,
            commissions,
            pix,
            base_url,
            settings,
        }
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<affiliates::Model>> {
        let affiliate = affiliates::Entity::find()
            .filter(affiliates::Column::AffiliateCode.eq(code))
            .one(&self.pool)
            .await?;
        Ok(affiliate)
    }

    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Option<affiliates::Model>> {
        let affiliate = affiliates::Entity::find()
            .filter(affiliates::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        Ok(affiliate)
    }

    /// Returns the user's affiliate profile, creating one lazily for accounts
    /// that predate the affiliate system. Code collisions are resolved by
    /// regenerating against the unique constraint.
    pub async fn ensure_profile(&self, user_id: i64) -> AppResult<affiliates::Model> {
        if let Some(affiliate) = self.find_by_user(user_id).await? {
            return Ok(affiliate);
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.create_profile(&user).await
    }

    pub async fn create_profile(&self, user: &users::Model) -> AppResult<affiliates::Model> {
        const MAX_ATTEMPTS: u32 = 5;

        for attempt in 0..MAX_ATTEMPTS {
            let code = generate_affiliate_code(&user.username);
            let result = affiliates::ActiveModel {
                user_id: Set(user.id),
                affiliate_code: Set(code.clone()),
                total_referrals: Set(0),
                level: Set(1),
                experience: Set(0),
                streak: Set(0),
                badges: Set(serde_json::json!([])),
                created_at: Set(Some(Utc::now())),
                updated_at: Set(Some(Utc::now())),
                ..Default::default()
            }
            .insert(&self.pool)
            .await;

            match result {
                Ok(affiliate) => return Ok(affiliate),
                Err(e) => {
                    log::warn!(
                        "Affiliate code collision for user {} (attempt {}): {e}",
                        user.id,
                        attempt + 1
                    );
                }
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique affiliate code".to_string(),
        ))
    }

    /// Derives level/XP/badges from the ledger counters and persists them.
    /// Idempotent: re-running with unchanged inputs yields the same state and
    /// an empty new_badges set.
    pub async fn compute_progress(&self, affiliate_id: i64) -> AppResult<AffiliateProgress> {
        let affiliate = affiliates::Entity::find_by_id(affiliate_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Affiliate profile not found".to_string()))?;

        let total_earnings = self.commissions.paid_total(affiliate.id).await?;

        let experience =
            experience_points(affiliate.total_referrals, affiliate.streak, total_earnings);
        let level = level_for_xp(experience);

        let current_badges = affiliate.badge_ids();
        let new_badges = evaluate_badges(
            &current_badges,
            affiliate.total_referrals,
            affiliate.streak,
            level,
            total_earnings,
        );

        let mut badges = current_badges;
        badges.extend(new_badges.iter().cloned());

        // Optimistic write guarded by the row version we read; a lost race is
        // fine, the state is recomputed on the next access.
        let result = affiliates::Entity::update_many()
            .col_expr(affiliates::Column::Level, Expr::value(level))
            .col_expr(affiliates::Column::Experience, Expr::value(experience))
            .col_expr(
                affiliates::Column::Badges,
                Expr::value(serde_json::json!(badges)),
            )
            .col_expr(affiliates::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(affiliates::Column::Id.eq(affiliate.id))
            .filter(affiliates::Column::UpdatedAt.eq(affiliate.updated_at))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            log::warn!(
                "Skipped progress persist for affiliate {}: row changed concurrently",
                affiliate.id
            );
        }

        Ok(AffiliateProgress {
            level,
            experience,
            next_level_xp: next_level_xp(level),
            progress_percent: progress_percent(experience, level),
            badges,
            new_badges,
            streak: affiliate.streak,
            total_earnings,
        })
    }

    /// Applies one qualifying referral event to the streak counter.
    pub async fn record_referral_activity(
        &self,
        affiliate_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let affiliate = affiliates::Entity::find_by_id(affiliate_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Affiliate profile not found".to_string()))?;

        let streak = next_streak(affiliate.streak, affiliate.last_referral_date, now);

        let mut model = affiliate.into_active_model();
        model.streak = Set(streak);
        model.last_referral_date = Set(Some(now));
        model.updated_at = Set(Some(now));
        model.update(&self.pool).await?;

        Ok(())
    }

    /// Credits a new signup to the referring affiliate: bumps the
    /// denormalized referral counter and advances the streak.
    pub async fn credit_referral(&self, affiliate_code: &str, now: DateTime<Utc>) -> AppResult<()> {
        let Some(affiliate) = self.find_by_code(affiliate_code).await? else {
            // Unknown codes are tolerated; the back-reference simply dangles.
            log::warn!("Referral signup with unknown affiliate code {affiliate_code}");
            return Ok(());
        };

        affiliates::Entity::update_many()
            .col_expr(
                affiliates::Column::TotalReferrals,
                Expr::col(affiliates::Column::TotalReferrals).add(1),
            )
            .filter(affiliates::Column::Id.eq(affiliate.id))
            .exec(&self.pool)
            .await?;

        self.record_referral_activity(affiliate.id, now).await
    }

    pub async fn get_stats(&self, user_id: i64) -> AppResult<AffiliateStatsResponse> {
        let affiliate = self.ensure_profile(user_id).await?;
        let (total_earnings, pending_earnings) = self.commissions.totals(affiliate.id).await?;

        Ok(AffiliateStatsResponse {
            affiliate_link: format!("{}?ref={}", self.base_url, affiliate.affiliate_code),
            custom_link: affiliate
                .custom_slug
                .as_ref()
                .map(|slug| format!("{}/{slug}", self.base_url)),
            affiliate_code: affiliate.affiliate_code,
            total_referrals: affiliate.total_referrals,
            total_earnings,
            pending_earnings,
            withdrawal_key: affiliate.withdrawal_key,
        })
    }

    pub async fn badge_catalog(&self, user_id: i64) -> AppResult<BadgeCatalogResponse> {
        let affiliate = self.ensure_profile(user_id).await?;
        let earned = affiliate.badge_ids();

        let badges: Vec<BadgeInfo> = BADGES
            .iter()
            .map(|b| BadgeInfo {
                id: b.id.to_string(),
                name: b.name.to_string(),
                icon: b.icon.to_string(),
                description: b.description.to_string(),
                earned: earned.iter().any(|e| e == b.id),
            })
            .collect();

        Ok(BadgeCatalogResponse {
            earned_count: earned.len(),
            total_count: badges.len(),
            badges,
        })
    }

    pub async fn set_withdrawal_key(&self, user_id: i64, key: &str) -> AppResult<()> {
        if key.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Withdrawal key is required".to_string(),
            ));
        }

        let affiliate = self.ensure_profile(user_id).await?;
        let mut model = affiliate.into_active_model();
        model.withdrawal_key = Set(Some(key.trim().to_string()));
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }

    /// Pays out the affiliate's paid balance via PIX, then marks those rows
    /// withdrawn.
    pub async fn withdraw(&self, user_id: i64) -> AppResult<WithdrawResponse> {
        let affiliate = self
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Affiliate profile not found".to_string()))?;

        let withdrawal_key = affiliate.withdrawal_key.clone().ok_or_else(|| {
            AppError::ValidationError(
                "Set a withdrawal key before requesting a payout".to_string(),
            )
        })?;

        let amount = self.commissions.paid_total(affiliate.id).await?;
        if amount < self.settings.min_withdrawal {
            return Err(AppError::ValidationError(format!(
                "Minimum withdrawal is {} cents, available balance is {amount}",
                self.settings.min_withdrawal
            )));
        }

        let description = format!("FLUXDRIVE commission payout - {}", affiliate.affiliate_code);
        let cash_out = self
            .pix
            .create_cash_out(amount, &withdrawal_key, &description)
            .await?;

        let moved = self.commissions.withdraw_paid(affiliate.id).await?;
        log::info!(
            "Withdrawal of {amount} cents for affiliate {} ({moved} commissions)",
            affiliate.affiliate_code
        );

        Ok(WithdrawResponse {
            amount,
            transaction_id: cash_out.id,
        })
    }

    pub async fn set_custom_slug(&self, user_id: i64, slug: &str) -> AppResult<CustomLinkResponse> {
        let slug = slug.trim().to_lowercase();
        let slug_format = regex::Regex::new(r"^[a-z0-9-]+$")
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        if slug.is_empty() || !slug_format.is_match(&slug) {
            return Err(AppError::ValidationError(
                "Slug may contain only letters, digits and hyphens".to_string(),
            ));
        }

        let taken = affiliates::Entity::find()
            .filter(affiliates::Column::CustomSlug.eq(slug.clone()))
            .filter(affiliates::Column::UserId.ne(user_id))
            .one(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("This slug is already in use".to_string()));
        }

        let affiliate = self.ensure_profile(user_id).await?;
        let mut model = affiliate.into_active_model();
        model.custom_slug = Set(Some(slug.clone()));
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(CustomLinkResponse {
            custom_link: format!("{}/{slug}", self.base_url),
            custom_slug: slug,
        })
    }

    pub async fn sharing_links(&self, user_id: i64) -> AppResult<SharingLinksResponse> {
        let affiliate = self.ensure_profile(user_id).await?;

        let automatic = format!("{}?ref={}", self.base_url, affiliate.affiliate_code);
        let custom = affiliate
            .custom_slug
            .as_ref()
            .map(|slug| format!("{}/{slug}", self.base_url));
        let main_link = custom.clone().unwrap_or_else(|| automatic.clone());

        let message = format!(
            "FLUXDRIVE - full financial tracking for drivers! {}h free trial. {main_link}",
            self.settings.trial_hours
        );
        let encoded: String = urlencode(&message);

        Ok(SharingLinksResponse {
            affiliate_code: affiliate.affiliate_code,
            whatsapp: format!("https://wa.me/?text={encoded}"),
            telegram: format!(
                "https://t.me/share/url?url={}&text={encoded}",
                urlencode(&main_link)
            ),
            automatic,
            custom,
        })
    }
}

fn urlencode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_level_threshold_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(999), 4);
        assert_eq!(level_for_xp(1000), 5);
        assert_eq!(level_for_xp(29999), 9);
        assert_eq!(level_for_xp(30000), 10);
        assert_eq!(level_for_xp(1_000_000), 10);
    }

    #[test]
    fn test_level_monotonicity() {
        let samples = [0, 50, 99, 100, 249, 250, 999, 1000, 7999, 8000, 29999, 30000, 40000];
        for window in samples.windows(2) {
            assert!(level_for_xp(window[0]) <= level_for_xp(window[1]));
        }
    }

    #[test]
    fn test_experience_points() {
        // 3 referrals, streak 2, R$ 25.00 paid
        assert_eq!(experience_points(3, 2, 2500), 150 + 50 + 50);
        assert_eq!(experience_points(0, 0, 0), 0);
        // earnings component floors: R$ 0.49 * 2 -> 0 XP
        assert_eq!(experience_points(0, 0, 49), 0);
    }

    #[test]
    fn test_progress_percent() {
        // level 2 spans 100..250
        assert_eq!(progress_percent(100, 2), 0);
        assert_eq!(progress_percent(175, 2), 50);
        assert_eq!(progress_percent(249, 2), 99);
        assert_eq!(progress_percent(30000, 10), 100);
    }

    #[test]
    fn test_badges_earned_in_one_pass() {
        let earned = evaluate_badges(&[], 12, 7, 5, 15_000);
        assert_eq!(
            earned,
            vec![
                "first_referral",
                "streak_3",
                "streak_7",
                "level_5",
                "referrals_10",
                "earnings_100"
            ]
        );
    }

    #[test]
    fn test_badges_idempotent() {
        let first = evaluate_badges(&[], 12, 7, 5, 15_000);
        let second = evaluate_badges(&first, 12, 7, 5, 15_000);
        assert!(second.is_empty());
    }

    fn ts(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_streak_first_event() {
        assert_eq!(next_streak(0, None, ts("2026-03-01 10:00:00")), 1);
    }

    #[test]
    fn test_streak_same_day_unchanged() {
        let last = ts("2026-03-01 08:00:00");
        assert_eq!(next_streak(3, Some(last), ts("2026-03-01 20:00:00")), 3);
    }

    #[test]
    fn test_streak_next_day_increments() {
        let last = ts("2026-03-01 10:00:00");
        assert_eq!(next_streak(3, Some(last), ts("2026-03-02 12:00:00")), 4);
    }

    #[test]
    fn test_streak_gap_resets() {
        let last = ts("2026-03-01 10:00:00");
        assert_eq!(next_streak(3, Some(last), ts("2026-03-06 10:00:00")), 1);
    }

    #[test]
    fn test_streak_negative_delta_resets() {
        // clock skew: "now" is half a day before the stored date
        let last = ts("2026-03-02 10:00:00");
        assert_eq!(next_streak(3, Some(last), ts("2026-03-01 22:00:00")), 1);
    }

    #[test]
    fn test_streak_uses_elapsed_time_not_calendar_days() {
        // 23h59m apart across midnight still counts as the same day
        let last = ts("2026-03-01 00:01:00");
        assert_eq!(next_streak(3, Some(last), ts("2026-03-02 00:00:00")), 3);
    }
}
