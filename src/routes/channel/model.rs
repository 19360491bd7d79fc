use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 支付渠道配置，对客户端只读
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentChannel {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub exchange_rate: Decimal,
    pub fee_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentChannel {
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PaymentChannel>(
            r#"
            SELECT id, name, code, exchange_rate, fee_rate, is_active, created_at, updated_at
            FROM payment_channels
            WHERE is_active
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_active_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PaymentChannel>(
            r#"
            SELECT id, name, code, exchange_rate, fee_rate, is_active, created_at, updated_at
            FROM payment_channels
            WHERE code = $1 AND is_active
            "#,
        )
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// 扣除渠道费率后按渠道汇率折算 USDT，保留两位小数
    pub fn usdt_for(&self, amount: Decimal) -> Option<Decimal> {
        let net = amount * (Decimal::ONE - self.fee_rate);
        net.checked_div(self.exchange_rate)
            .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}
