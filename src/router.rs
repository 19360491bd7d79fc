use axum::{
    Router,
    routing::{get, post, put},
};
use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
};

/// 不需要会话的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(routes::user::register))
        .route("/users/login", post(routes::user::login))
        .route("/admin/login", post(routes::admin::admin_login))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // 用户
        .route("/users/me", get(routes::user::me))
        .route("/users/profile", put(routes::user::update_profile))
        .route("/users/online-status", put(routes::user::update_online_status))
        .route("/users/refresh-token", post(routes::user::refresh_token))
        .route("/users/check-token", get(routes::user::check_token))
        // 订单
        .route("/orders", get(routes::order::list_orders))
        .route("/orders/{order_id}", get(routes::order::get_order))
        .route("/orders/{order_id}/history", get(routes::order::order_history))
        // 钱包与渠道
        .route("/wallet", get(routes::wallet::get_wallet))
        .route("/wallet/recharge", post(routes::wallet::recharge))
        .route("/channels", get(routes::channel::list_channels))
        // 商户密钥
        .route(
            "/merchant/api-keys",
            get(routes::api_key::list_api_keys).post(routes::api_key::create_api_key),
        )
        .route(
            "/merchant/api-keys/{key_id}",
            axum::routing::delete(routes::api_key::delete_api_key),
        )
        .route(
            "/merchant/api-keys/{key_id}/active",
            put(routes::api_key::set_api_key_active),
        )
        // 管理后台
        .route("/admin/users", get(routes::admin::list_users))
        .route("/admin/orders", get(routes::admin::list_all_orders))
        .route(
            "/admin/orders/{order_id}/status",
            put(routes::admin::update_order_status),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// 组装全部路由，限流和 CORS 在 main 中追加
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
