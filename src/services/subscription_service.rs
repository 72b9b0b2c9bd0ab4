use crate::config::AffiliateConfig;
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::external::PixService;
use crate::models::{
    CreateSubscriptionResponse, PixWebhookPayload, SubscriptionStatusResponse, TrialInfo,
};
use crate::services::affiliate_service::AffiliateService;
use crate::services::auth_service::has_access;
use crate::services::commission_service::CommissionService;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
    pix: PixService,
    commissions: CommissionService,
    affiliates: AffiliateService,
    base_url: String,
    settings: AffiliateConfig,
}

impl SubscriptionService {
    pub fn new(
        pool: DatabaseConnection,
        pix: PixService,
        commissions: CommissionService,
        affiliates: AffiliateService,
        base_url: String,
        settings: AffiliateConfig,
    ) -> Self {
        Self {
            pool,
            pix,
            commissions,
            affiliates,
            base_url,
            settings,
        }
    }

    /// Creates the PIX charge for the subscription and, when the user was
    /// referred, books the referrer's pending commission against the same
    /// payment id.
    pub async fn create_subscription(&self, user_id: i64) -> AppResult<CreateSubscriptionResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_paid {
            return Err(AppError::Conflict(
                "Subscription is already active".to_string(),
            ));
        }

        let webhook_url = format!("{}/webhook/pix", self.base_url);
        let value = self.settings.subscription_value;
        let charge = self
            .pix
            .create_cash_in(
                value,
                &webhook_url,
                &format!("FLUXDRIVE subscription - {}", user.username),
            )
            .await?;

        let referrer = match user.referred_by.as_deref() {
            Some(code) => self.affiliates.find_by_code(code).await?,
            None => None,
        };
        let has_affiliate = referrer.is_some();

        let referred_user_id = user.id;
        let mut model = user.into_active_model();
        model.payment_id = Set(Some(charge.id.clone()));
        model.payment_status = Set(Some("pending".to_string()));
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        if let Some(affiliate) = referrer {
            self.commissions
                .create_pending(
                    affiliate.id,
                    referred_user_id,
                    &charge.id,
                    value,
                    self.settings.commission_percent,
                )
                .await?;
        }

        log::info!("Created subscription charge {} for user {referred_user_id}", charge.id);

        Ok(CreateSubscriptionResponse {
            payment_id: charge.id,
            payment_link: charge.init_point,
            qr_code: charge.qr_code,
            value,
            has_affiliate,
        })
    }

    /// Settles a provider callback. Activation and commission confirmation
    /// are both conditional updates keyed on the payment id, so redelivered
    /// webhooks are no-ops.
    pub async fn handle_webhook(&self, payload: PixWebhookPayload) -> AppResult<()> {
        let status = payload.status.to_lowercase();
        log::info!("PIX webhook for payment {}: {status}", payload.id);

        match status.as_str() {
            "paid" | "approved" | "confirmed" => self.settle_paid(&payload.id).await,
            "failed" | "cancelled" | "canceled" | "expired" | "refunded" => {
                self.settle_failed(&payload.id, &status).await
            }
            _ => {
                log::warn!("Ignoring webhook status {status} for payment {}", payload.id);
                Ok(())
            }
        }
    }

    async fn settle_paid(&self, payment_id: &str) -> AppResult<()> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsPaid, Expr::value(true))
            .col_expr(
                users::Column::PaymentStatus,
                Expr::value(Some("paid".to_string())),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::PaymentId.eq(payment_id))
            .filter(users::Column::IsPaid.eq(false))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            // Duplicate delivery or a payment we never issued.
            log::warn!("Webhook payment {payment_id} matched no pending subscription");
        }

        let confirmed = self.commissions.confirm_paid(payment_id).await?;
        if confirmed > 0 {
            log::info!("Confirmed {confirmed} commission(s) for payment {payment_id}");
        }

        Ok(())
    }

    async fn settle_failed(&self, payment_id: &str, status: &str) -> AppResult<()> {
        users::Entity::update_many()
            .col_expr(
                users::Column::PaymentStatus,
                Expr::value(Some(status.to_string())),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::PaymentId.eq(payment_id))
            .filter(users::Column::IsPaid.eq(false))
            .exec(&self.pool)
            .await?;

        self.commissions.mark_failed(payment_id).await?;
        Ok(())
    }

    pub async fn status(&self, user: &users::Model) -> SubscriptionStatusResponse {
        let now = Utc::now();
        let trial = match (user.is_trial_active, user.trial_end) {
            (true, Some(end)) if end > now => Some(TrialInfo {
                hours_left: (end - now).num_hours().max(0),
                trial_end: end,
            }),
            _ => None,
        };

        SubscriptionStatusResponse {
            is_paid: user.is_paid,
            has_access: has_access(user, now),
            trial,
        }
    }
}
