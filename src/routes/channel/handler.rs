use axum::extract::{Json, State};

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, success_to_api_response},
};

use super::model::PaymentChannel;

#[axum::debug_handler]
pub async fn list_channels(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PaymentChannel>>>, AppError> {
    let channels = PaymentChannel::list_active(&state.pool).await?;
    Ok(success_to_api_response(channels))
}
