use axum::extract::{Extension, Json, State};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    routes::{
        channel::PaymentChannel,
        order::{ChannelOrder, NewOrder, OrderFilter},
        user::UserProfile,
    },
    utils::{ApiResponse, Claims, success_to_api_response},
};

use super::model::{RechargeRequest, WalletSummary, generate_order_no, normalize_amount};

#[axum::debug_handler]
pub async fn get_wallet(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WalletSummary>>, AppError> {
    claims.require_agent()?;
    let profile = UserProfile::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or(AppError::NotFound("用户"))?;

    let transactions =
        ChannelOrder::list(&state.pool, &OrderFilter::default(), Some(claims.sub)).await?;

    Ok(success_to_api_response(WalletSummary {
        balance: profile.balance,
        transactions,
    }))
}

#[axum::debug_handler]
pub async fn recharge(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<RechargeRequest>,
) -> Result<Json<ApiResponse<ChannelOrder>>, AppError> {
    claims.require_agent()?;
    let amount = normalize_amount(req.amount).map_err(AppError::validation)?;
    let code = req.channel_code.trim();
    if code.is_empty() {
        return Err(AppError::validation("请选择支付渠道"));
    }

    let channel = PaymentChannel::find_active_by_code(&state.pool, code)
        .await?
        .ok_or(AppError::NotFound("支付渠道"))?;
    let usdt_amount = channel
        .usdt_for(amount)
        .ok_or_else(|| AppError::validation("支付渠道汇率无效"))?;

    let order = ChannelOrder::create(
        &state.pool,
        NewOrder {
            order_no: generate_order_no(Utc::now()),
            channel_id: channel.id,
            user_id: claims.sub,
            amount,
            usdt_amount,
            note: req.note.filter(|n| !n.trim().is_empty()),
        },
    )
    .await?;

    Ok(success_to_api_response(order))
}
