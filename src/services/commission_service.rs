use crate::entities::{CommissionStatus, commission_entity as commissions};
use crate::error::AppResult;
use crate::models::CommissionResponse;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Rounded commission in cents for a subscription payment.
pub fn commission_for(subscription_value: i64, percent: i64) -> i64 {
    (subscription_value * percent + 50) / 100
}

/// Paid and pending totals folded from commission rows.
pub fn earnings_summary(rows: &[commissions::Model]) -> (i64, i64) {
    rows.iter().fold((0, 0), |(paid, pending), row| match row.status {
        CommissionStatus::Paid => (paid + row.commission_amount, pending),
        CommissionStatus::Pending => (paid, pending + row.commission_amount),
        _ => (paid, pending),
    })
}

#[derive(Clone)]
pub struct CommissionService {
    pool: DatabaseConnection,
}

impl CommissionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Records a pending commission at payment-initiation time. The amount is
    /// fixed here and never recomputed.
    pub async fn create_pending(
        &self,
        affiliate_id: i64,
        referred_user_id: i64,
        payment_id: &str,
        subscription_value: i64,
        commission_percent: i64,
    ) -> AppResult<CommissionResponse> {
        let commission = commissions::ActiveModel {
            affiliate_id: Set(affiliate_id),
            referred_user_id: Set(referred_user_id),
            payment_id: Set(payment_id.to_string()),
            commission_amount: Set(commission_for(subscription_value, commission_percent)),
            subscription_value: Set(subscription_value),
            status: Set(CommissionStatus::Pending),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(CommissionResponse::from(commission))
    }

    /// Flips pending rows for a payment to paid in one conditional UPDATE, so
    /// a duplicate webhook delivery finds no pending row and is a no-op.
    pub async fn confirm_paid(&self, payment_id: &str) -> AppResult<u64> {
        let result = commissions::Entity::update_many()
            .col_expr(
                commissions::Column::Status,
                Expr::value(CommissionStatus::Paid),
            )
            .col_expr(commissions::Column::PaidAt, Expr::value(Some(Utc::now())))
            .filter(commissions::Column::PaymentId.eq(payment_id))
            .filter(commissions::Column::Status.eq(CommissionStatus::Pending))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    /// Marks pending rows for a payment as failed (terminal).
    pub async fn mark_failed(&self, payment_id: &str) -> AppResult<u64> {
        let result = commissions::Entity::update_many()
            .col_expr(
                commissions::Column::Status,
                Expr::value(CommissionStatus::Failed),
            )
            .filter(commissions::Column::PaymentId.eq(payment_id))
            .filter(commissions::Column::Status.eq(CommissionStatus::Pending))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    /// Moves every paid row of an affiliate to withdrawn after a successful
    /// cash-out; same conditional-update pattern as confirm_paid.
    pub async fn withdraw_paid(&self, affiliate_id: i64) -> AppResult<u64> {
        let result = commissions::Entity::update_many()
            .col_expr(
                commissions::Column::Status,
                Expr::value(CommissionStatus::Withdrawn),
            )
            .col_expr(
                commissions::Column::WithdrawnAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(commissions::Column::AffiliateId.eq(affiliate_id))
            .filter(commissions::Column::Status.eq(CommissionStatus::Paid))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    /// (paid, pending) totals in cents for one affiliate.
    pub async fn totals(&self, affiliate_id: i64) -> AppResult<(i64, i64)> {
        let rows = commissions::Entity::find()
            .filter(commissions::Column::AffiliateId.eq(affiliate_id))
            .all(&self.pool)
            .await?;

        Ok(earnings_summary(&rows))
    }

    pub async fn paid_total(&self, affiliate_id: i64) -> AppResult<i64> {
        let (paid, _) = self.totals(affiliate_id).await?;
        Ok(paid)
    }

    pub async fn list_for_affiliate(
        &self,
        affiliate_id: i64,
    ) -> AppResult<Vec<CommissionResponse>> {
        let rows = commissions::Entity::find()
            .filter(commissions::Column::AffiliateId.eq(affiliate_id))
            .order_by_desc(commissions::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CommissionResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, amount: i64, status: CommissionStatus) -> commissions::Model {
        commissions::Model {
            id,
            affiliate_id: 1,
            referred_user_id: 100 + id,
            payment_id: format!("pay_{id}"),
            commission_amount: amount,
            subscription_value: amount * 2,
            status,
            paid_at: None,
            withdrawn_at: None,
            created_at: None,
        }
    }

    #[test]
    fn test_commission_rounding() {
        // 45% of R$29.90 is R$13.455, rounded to R$13.46
        assert_eq!(commission_for(2990, 45), 1346);
        assert_eq!(commission_for(1000, 45), 450);
        assert_eq!(commission_for(0, 45), 0);
    }

    #[test]
    fn test_earnings_summary_partial_aggregation() {
        let rows = vec![
            row(1, 1000, CommissionStatus::Paid),
            row(2, 2000, CommissionStatus::Pending),
            row(3, 3000, CommissionStatus::Paid),
        ];
        let (paid, pending) = earnings_summary(&rows);
        assert_eq!(paid, 4000);
        assert_eq!(pending, 2000);
    }

    #[test]
    fn test_earnings_summary_ignores_terminal_states() {
        let rows = vec![
            row(1, 1000, CommissionStatus::Failed),
            row(2, 2000, CommissionStatus::Withdrawn),
        ];
        assert_eq!(earnings_summary(&rows), (0, 0));
    }
}
