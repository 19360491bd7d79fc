use axum::extract::{Extension, Json, Path, Query, State};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, Claims, success_to_api_response},
};

use super::filter::OrderFilter;
use super::model::{ChannelOrder, OrderDetail, OrderStatusHistory};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 管理员可以查看任意订单，普通用户只看自己的
fn owner_scope(claims: &Claims) -> Option<Uuid> {
    (!claims.is_admin()).then_some(claims.sub)
}

#[axum::debug_handler]
pub async fn list_orders(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Vec<ChannelOrder>> {
    let orders = ChannelOrder::list(&state.pool, &filter, Some(claims.sub)).await?;
    Ok(success_to_api_response(orders))
}

#[axum::debug_handler]
pub async fn get_order(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<OrderDetail> {
    let order = ChannelOrder::find(&state.pool, order_id, owner_scope(&claims))
        .await?
        .ok_or(AppError::NotFound("订单"))?;
    Ok(success_to_api_response(OrderDetail::from(order)))
}

#[axum::debug_handler]
pub async fn order_history(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Vec<OrderStatusHistory>> {
    // 先确认订单对当前用户可见
    ChannelOrder::find(&state.pool, order_id, owner_scope(&claims))
        .await?
        .ok_or(AppError::NotFound("订单"))?;

    let history = ChannelOrder::history(&state.pool, order_id).await?;
    Ok(success_to_api_response(history))
}
