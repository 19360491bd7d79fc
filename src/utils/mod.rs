use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// 会话角色，对应前端的两个登录标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    Admin,
}

impl Role {
    /// 携带该角色令牌的 cookie 名
    pub fn cookie_name(self) -> &'static str {
        match self {
            Role::Agent => "local_auth_user",
            Role::Admin => "admin_login_success",
        }
    }

    fn ttl_secs(self, config: &Config) -> i64 {
        match self {
            Role::Agent => config.jwt_expiration().as_secs() as i64,
            Role::Admin => config.admin_jwt_expiration().as_secs() as i64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // 用户ID
    pub role: Role, // 会话角色
    pub exp: i64,   // 过期时间
    pub iat: i64,   // 签发时间
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// 钱包、资料、API 密钥只属于代理商账号，管理员会话没有对应的资料行
    pub fn require_agent(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Err(AppError::PermissionDenied)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionToken {
    pub user_id: Uuid,
    pub role: Role,
    pub token: String,
    pub expires_at: i64,
}

pub fn generate_token(
    user_id: Uuid,
    role: Role,
    config: &Config,
) -> Result<SessionToken, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = (now + Duration::seconds(role.ttl_secs(config))).timestamp();

    let claims = Claims {
        sub: user_id,
        role,
        exp: expires_at,
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    tracing::debug!(%user_id, ?role, "issued session token");

    Ok(SessionToken {
        user_id,
        role,
        token,
        expires_at,
    })
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INVALID_TRANSITION: i32 = 1006;
    pub const CONFLICT: i32 = 1007;
    pub const INTERNAL_ERROR: i32 = 5000;
}
