use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::{error_codes, hash_password, verify_password};

/// 认证账号，密码哈希只在这里出现
#[derive(Debug, FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub balance: Decimal,
    pub invite_code: Option<String>,
    pub online_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub invite_code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OnlineStatusRequest {
    pub online_status: bool,
}

const PROFILE_COLUMNS: &str = "id, username, phone, full_name, avatar_url, balance, \
     invite_code, online_status, created_at, updated_at";

impl AuthUser {
    /// 创建账号并在同一事务中建立带邀请码的资料行
    pub async fn sign_up(
        pool: &PgPool,
        username: &str,
        password: &str,
        invite_code: &str,
    ) -> Result<Self, AppError> {
        let password_hash = hash_password(password)?;

        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            INSERT INTO auth_users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::on_unique(e, error_codes::USER_EXISTS, "账号已存在"))?;

        sqlx::query("INSERT INTO user_profiles (id, username, invite_code) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.username)
            .bind(invite_code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Created account {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AuthUser>(
            "SELECT id, username, password_hash FROM auth_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub fn verify_login(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify_password(password, &self.password_hash)
    }
}

impl UserProfile {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM user_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 只覆盖请求中给出的字段
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            UPDATE user_profiles
            SET full_name = COALESCE($1, full_name),
                phone = COALESCE($2, phone),
                avatar_url = COALESCE($3, avatar_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(req.full_name)
        .bind(req.phone)
        .bind(req.avatar_url)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn set_online_status(
        pool: &PgPool,
        id: Uuid,
        online_status: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles SET online_status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {}",
            PROFILE_COLUMNS
        ))
        .bind(online_status)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM user_profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }
}
