use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

pub const KEY_PREFIX: &str = "mk_";
pub const PERMISSIONS: [&str; 3] = ["orders:read", "orders:write", "wallet:read"];

const SECRET_HEX_LEN: usize = 48;

/// 商户 API 密钥。`api_key` 列只保存密钥的 SHA-256
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MerchantApiKey {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub key_prefix: String,
    pub key_suffix: String,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// 创建时唯一一次返回明文密钥
#[derive(Debug, Serialize)]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub key: MerchantApiKey,
    pub secret: String,
}

#[derive(Debug)]
pub struct MintedKey {
    pub plaintext: String,
    pub digest: String,
    pub prefix: String,
    pub suffix: String,
}

pub fn digest_key(plaintext: &str) -> String {
    format!("{:x}", Sha256::digest(plaintext.as_bytes()))
}

pub fn mint_key() -> MintedKey {
    let entropy = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );
    let plaintext = format!("{}{}", KEY_PREFIX, &entropy[..SECRET_HEX_LEN]);

    MintedKey {
        digest: digest_key(&plaintext),
        prefix: plaintext[..KEY_PREFIX.len() + 4].to_string(),
        suffix: plaintext[plaintext.len() - 4..].to_string(),
        plaintext,
    }
}

/// 去重排序；出现未知权限时返回该权限
pub fn normalize_permissions(requested: &[String]) -> Result<Vec<String>, String> {
    let mut permissions = Vec::with_capacity(requested.len());
    for p in requested {
        let p = p.trim();
        if !PERMISSIONS.contains(&p) {
            return Err(p.to_string());
        }
        permissions.push(p.to_string());
    }
    permissions.sort();
    permissions.dedup();
    Ok(permissions)
}

const KEY_COLUMNS: &str = "id, merchant_id, name, api_key, key_prefix, key_suffix, is_active, \
     permissions, created_at, updated_at, last_used_at";

impl MerchantApiKey {
    pub async fn list_for(pool: &PgPool, merchant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MerchantApiKey>(&format!(
            "SELECT {} FROM merchant_api_keys WHERE merchant_id = $1 ORDER BY created_at DESC",
            KEY_COLUMNS
        ))
        .bind(merchant_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        merchant_id: Uuid,
        name: &str,
        permissions: Vec<String>,
        minted: &MintedKey,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MerchantApiKey>(&format!(
            r#"
            INSERT INTO merchant_api_keys
                (id, merchant_id, name, api_key, key_prefix, key_suffix, permissions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            KEY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(merchant_id)
        .bind(name)
        .bind(&minted.digest)
        .bind(&minted.prefix)
        .bind(&minted.suffix)
        .bind(permissions)
        .fetch_one(pool)
        .await
    }

    pub async fn set_active(
        pool: &PgPool,
        id: Uuid,
        merchant_id: Uuid,
        is_active: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MerchantApiKey>(&format!(
            "UPDATE merchant_api_keys SET is_active = $1, updated_at = NOW() \
             WHERE id = $2 AND merchant_id = $3 RETURNING {}",
            KEY_COLUMNS
        ))
        .bind(is_active)
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid, merchant_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM merchant_api_keys WHERE id = $1 AND merchant_id = $2")
            .bind(id)
            .bind(merchant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
