use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::order::OrderStatus;
use crate::utils::{hash_password, verify_password};

#[derive(Debug, FromRow)]
pub struct AdminAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub note: Option<String>,
}

impl AdminAccount {
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AdminAccount>(
            "SELECT id, username, password_hash FROM admin_accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// 启动时创建初始管理员；已存在则不改动
    pub async fn ensure(pool: &PgPool, username: &str, password: &str) -> Result<(), AppError> {
        let password_hash = hash_password(password)?;

        let created = sqlx::query(
            r#"
            INSERT INTO admin_accounts (id, username, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?
        .rows_affected();

        if created > 0 {
            tracing::info!("Created bootstrap admin account {}", username);
        }
        Ok(())
    }

    pub fn verify_login(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify_password(password, &self.password_hash)
    }
}
