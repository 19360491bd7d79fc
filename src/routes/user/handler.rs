use axum::extract::{Extension, Json, State};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, Claims, Role, SessionToken, generate_token, success_to_api_response},
};

use super::model::{
    AuthUser, LoginRequest, OnlineStatusRequest, RegisterRequest, UpdateProfileRequest,
    UserProfile,
};
use super::validation::validate_registration;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

#[derive(Debug, Serialize)]
pub struct CheckTokenResponse {
    pub user_id: Uuid,
    pub role: Role,
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<SessionToken> {
    if let Some(msg) = validate_registration(&req) {
        return Err(AppError::validation(msg));
    }

    let user = AuthUser::sign_up(
        &state.pool,
        req.username.trim(),
        &req.password,
        req.invite_code.trim(),
    )
    .await?;

    let session = generate_token(user.id, Role::Agent, &state.config)?;
    Ok(success_to_api_response(session))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<SessionToken> {
    let user = AuthUser::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.verify_login(&req.password)? {
        tracing::info!("Failed login for {}", user.username);
        return Err(AppError::Unauthorized);
    }

    let session = generate_token(user.id, Role::Agent, &state.config)?;
    Ok(success_to_api_response(session))
}

#[axum::debug_handler]
pub async fn me(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<UserProfile> {
    claims.require_agent()?;
    let profile = UserProfile::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or(AppError::NotFound("用户"))?;
    Ok(success_to_api_response(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<UserProfile> {
    claims.require_agent()?;
    let profile = UserProfile::update_profile(&state.pool, claims.sub, req).await?;
    Ok(success_to_api_response(profile))
}

#[axum::debug_handler]
pub async fn update_online_status(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<OnlineStatusRequest>,
) -> ApiResult<UserProfile> {
    claims.require_agent()?;
    let profile =
        UserProfile::set_online_status(&state.pool, claims.sub, req.online_status).await?;
    Ok(success_to_api_response(profile))
}

#[axum::debug_handler]
pub async fn refresh_token(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<SessionToken> {
    let session = generate_token(claims.sub, claims.role, &state.config)?;
    Ok(success_to_api_response(session))
}

/// 中间件已完成验签，这里只回显会话信息
#[axum::debug_handler]
pub async fn check_token(Extension(claims): Extension<Claims>) -> ApiResult<CheckTokenResponse> {
    Ok(success_to_api_response(CheckTokenResponse {
        user_id: claims.sub,
        role: claims.role,
    }))
}
