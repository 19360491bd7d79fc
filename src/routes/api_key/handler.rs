use axum::extract::{Extension, Json, Path, State};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, Claims, error_codes, success_to_api_response},
};

use super::model::{
    CreateApiKeyRequest, CreatedApiKey, MerchantApiKey, SetActiveRequest, mint_key,
    normalize_permissions,
};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

#[axum::debug_handler]
pub async fn list_api_keys(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Vec<MerchantApiKey>> {
    claims.require_agent()?;
    let keys = MerchantApiKey::list_for(&state.pool, claims.sub).await?;
    Ok(success_to_api_response(keys))
}

#[axum::debug_handler]
pub async fn create_api_key(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateApiKeyRequest>,
) -> ApiResult<CreatedApiKey> {
    claims.require_agent()?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("请填写密钥名称"));
    }
    let permissions = normalize_permissions(&req.permissions)
        .map_err(|p| AppError::validation(format!("未知权限: {}", p)))?;

    let minted = mint_key();
    let key = MerchantApiKey::create(&state.pool, claims.sub, name, permissions, &minted)
        .await
        .map_err(|e| AppError::on_unique(e, error_codes::CONFLICT, "密钥冲突，请重试"))?;
    tracing::info!("Issued api key {}... for merchant {}", key.key_prefix, claims.sub);

    Ok(success_to_api_response(CreatedApiKey {
        key,
        secret: minted.plaintext,
    }))
}

#[axum::debug_handler]
pub async fn set_api_key_active(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(key_id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> ApiResult<MerchantApiKey> {
    claims.require_agent()?;
    let key = MerchantApiKey::set_active(&state.pool, key_id, claims.sub, req.is_active)
        .await?
        .ok_or(AppError::NotFound("密钥"))?;
    Ok(success_to_api_response(key))
}

#[axum::debug_handler]
pub async fn delete_api_key(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(key_id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    claims.require_agent()?;
    if !MerchantApiKey::delete(&state.pool, key_id, claims.sub).await? {
        return Err(AppError::NotFound("密钥"));
    }
    Ok(success_to_api_response(serde_json::json!({ "success": true })))
}
