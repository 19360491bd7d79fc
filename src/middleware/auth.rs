use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    extract::CookieJar,
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};

use crate::{
    AppState,
    config::Config,
    utils::{Claims, Role, verify_token},
};

#[derive(Debug)]
pub enum GateDecision {
    Allow(Claims),
    Redirect,
}

/// 按优先级收集请求携带的会话令牌：Authorization 头，然后是两个会话 cookie
pub fn session_tokens(headers: &HeaderMap) -> Vec<String> {
    let mut tokens = Vec::new();

    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        tokens.push(bearer.token().to_string());
    }

    let jar = CookieJar::from_headers(headers);
    for role in [Role::Agent, Role::Admin] {
        if let Some(cookie) = jar.get(role.cookie_name()) {
            if !cookie.value().is_empty() {
                tokens.push(cookie.value().to_string());
            }
        }
    }

    tokens
}

/// 任意一个令牌验签通过即放行
pub fn decide(tokens: &[String], config: &Config) -> GateDecision {
    for token in tokens {
        match verify_token(token, config) {
            Ok(claims) => return GateDecision::Allow(claims),
            Err(e) => tracing::debug!("Rejected session token: {}", e),
        }
    }
    GateDecision::Redirect
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let tokens = session_tokens(req.headers());

    match decide(&tokens, &state.config) {
        GateDecision::Allow(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        GateDecision::Redirect => {
            tracing::info!(
                path = %req.uri().path(),
                presented = tokens.len(),
                "No valid session, redirecting to login"
            );
            Redirect::to(&state.config.login_redirect).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_token;
    use axum::http::{HeaderValue, header};
    use uuid::Uuid;

    fn config() -> Config {
        Config {
            database_url: String::new(),
            redis_url: String::new(),
            jwt_secret: "gate-secret".into(),
            jwt_expiration_secs: 3600,
            admin_jwt_expiration_secs: 3600,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            server_host: "127.0.0.1".into(),
            server_port: 0,
            api_base_uri: "/api".into(),
            login_redirect: "/admin/login".into(),
            admin_username: None,
            admin_password: None,
        }
    }

    #[test]
    fn no_tokens_redirects() {
        assert!(matches!(decide(&[], &config()), GateDecision::Redirect));
    }

    #[test]
    fn garbage_tokens_redirect() {
        let tokens = vec!["true".to_string(), "not-a-jwt".to_string()];
        assert!(matches!(decide(&tokens, &config()), GateDecision::Redirect));
    }

    #[test]
    fn either_session_cookie_is_enough() {
        let config = config();
        for role in [Role::Agent, Role::Admin] {
            let session = generate_token(Uuid::new_v4(), role, &config).unwrap();
            let mut headers = HeaderMap::new();
            headers.insert(
                header::COOKIE,
                HeaderValue::from_str(&format!("{}={}", role.cookie_name(), session.token))
                    .unwrap(),
            );

            let tokens = session_tokens(&headers);
            match decide(&tokens, &config) {
                GateDecision::Allow(claims) => assert_eq!(claims.role, role),
                GateDecision::Redirect => panic!("{:?} session was not accepted", role),
            }
        }
    }

    #[test]
    fn invalid_header_falls_back_to_cookie() {
        let config = config();
        let session = generate_token(Uuid::new_v4(), Role::Agent, &config).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer expired.or.forged"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("local_auth_user={}", session.token)).unwrap(),
        );

        let tokens = session_tokens(&headers);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(decide(&tokens, &config), GateDecision::Allow(_)));
    }
}
