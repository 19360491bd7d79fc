use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::channel::PaymentChannel;

use super::display::{StatusDisplay, status_display};
use super::filter::OrderFilter;
use super::payment::PaymentInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }

    /// pending → processing → completed，pending/processing 都可以转为 failed
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Failed) | (Processing, Completed) | (Processing, Failed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChannelOrder {
    pub id: Uuid,
    pub order_no: String,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub usdt_amount: Decimal,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub channel: Option<Json<PaymentChannel>>,
}

/// 状态变更流水，只追加
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderStatusHistory {
    pub id: Uuid,
    pub order_id: Uuid,
    pub old_status: Option<String>,
    pub new_status: String,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: ChannelOrder,
    pub payment: PaymentInfo,
    pub status_display: StatusDisplay,
}

impl From<ChannelOrder> for OrderDetail {
    fn from(order: ChannelOrder) -> Self {
        Self {
            payment: PaymentInfo::compute(order.amount),
            status_display: status_display(order.status.as_str()),
            order,
        }
    }
}

#[derive(Debug)]
pub struct NewOrder {
    pub order_no: String,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub usdt_amount: Decimal,
    pub note: Option<String>,
}

/// 订单查询的公共部分，渠道以 JSON 形式带出
pub(super) const ORDER_SELECT: &str = r#"
    SELECT o.id, o.order_no, o.channel_id, o.user_id, o.amount, o.usdt_amount,
           o.status, o.note, o.created_at, o.updated_at,
           CASE WHEN c.id IS NULL THEN NULL ELSE to_jsonb(c) END AS channel
    FROM channel_orders o
    LEFT JOIN payment_channels c ON c.id = o.channel_id
    WHERE TRUE"#;

impl ChannelOrder {
    pub async fn create(pool: &PgPool, new: NewOrder) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO channel_orders (id, order_no, channel_id, user_id, amount, usdt_amount, status, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&new.order_no)
        .bind(new.channel_id)
        .bind(new.user_id)
        .bind(new.amount)
        .bind(new.usdt_amount)
        .bind(OrderStatus::Pending)
        .bind(&new.note)
        .execute(&mut *tx)
        .await?;

        record_history(&mut tx, id, None, OrderStatus::Pending, None, Some(new.user_id)).await?;
        tx.commit().await?;

        tracing::info!("Created order {} for user {}", new.order_no, new.user_id);
        Self::find(pool, id, None)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// `owner` 为 `Some` 时只返回该用户的订单
    pub async fn find(
        pool: &PgPool,
        id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(ORDER_SELECT);
        qb.push(" AND o.id = ").push_bind(id);
        if let Some(user_id) = owner {
            qb.push(" AND o.user_id = ").push_bind(user_id);
        }
        qb.build_query_as::<ChannelOrder>()
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &OrderFilter,
        owner: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = filter.to_query(owner);
        tracing::debug!("Listing orders: {:?}", filter);
        qb.build_query_as::<ChannelOrder>().fetch_all(pool).await
    }

    pub async fn history(
        pool: &PgPool,
        order_id: Uuid,
    ) -> Result<Vec<OrderStatusHistory>, sqlx::Error> {
        sqlx::query_as::<_, OrderStatusHistory>(
            r#"
            SELECT id, order_id, old_status, new_status, note, created_by, created_at
            FROM order_status_history
            WHERE order_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    /// 变更订单状态并追加流水；完成时把订单金额计入用户余额
    pub async fn transition(
        pool: &PgPool,
        id: Uuid,
        next: OrderStatus,
        note: Option<String>,
        actor: Uuid,
    ) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        let current: Option<(OrderStatus, Uuid, Decimal)> = sqlx::query_as(
            "SELECT status, user_id, amount FROM channel_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let (from, user_id, amount) = current.ok_or(AppError::NotFound("订单"))?;

        if !from.can_transition_to(next) {
            return Err(AppError::InvalidTransition { from, to: next });
        }

        sqlx::query("UPDATE channel_orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(next)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        record_history(&mut tx, id, Some(from), next, note, Some(actor)).await?;

        if next == OrderStatus::Completed {
            sqlx::query(
                "UPDATE user_profiles SET balance = balance + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(amount)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!("Order {} moved {} -> {} by {}", id, from, next, actor);

        Self::find(pool, id, None)
            .await?
            .ok_or_else(|| AppError::Internal(format!("订单 {id} 提交后无法读取")))
    }
}

async fn record_history(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    order_id: Uuid,
    old_status: Option<OrderStatus>,
    new_status: OrderStatus,
    note: Option<String>,
    created_by: Option<Uuid>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO order_status_history (id, order_id, old_status, new_status, note, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(old_status.map(OrderStatus::as_str))
    .bind(new_status.as_str())
    .bind(note)
    .bind(created_by)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
