use axum::extract::{Extension, Json, Path, Query, State};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    routes::{
        order::{ChannelOrder, OrderDetail, OrderFilter},
        user::{LoginRequest, UserProfile},
    },
    utils::{ApiResponse, Claims, Role, SessionToken, generate_token, success_to_api_response},
};

use super::model::{AdminAccount, UpdateStatusRequest};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<SessionToken> {
    let admin = AdminAccount::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !admin.verify_login(&req.password)? {
        tracing::warn!("Failed admin login for {}", admin.username);
        return Err(AppError::Unauthorized);
    }

    let session = generate_token(admin.id, Role::Admin, &state.config)?;
    Ok(success_to_api_response(session))
}

#[axum::debug_handler]
pub async fn list_users(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Vec<UserProfile>> {
    claims.require_admin()?;
    let users = UserProfile::list_all(&state.pool).await?;
    Ok(success_to_api_response(users))
}

#[axum::debug_handler]
pub async fn list_all_orders(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Vec<ChannelOrder>> {
    claims.require_admin()?;
    let orders = ChannelOrder::list(&state.pool, &filter, None).await?;
    Ok(success_to_api_response(orders))
}

#[axum::debug_handler]
pub async fn update_order_status(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<OrderDetail> {
    claims.require_admin()?;
    let note = req.note.filter(|n| !n.trim().is_empty());
    let order = ChannelOrder::transition(&state.pool, order_id, req.status, note, claims.sub).await?;
    Ok(success_to_api_response(OrderDetail::from(order)))
}
