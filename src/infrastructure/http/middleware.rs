//! HTTP Middleware
//!
//! - 状态码错误日志
//! - 写操作的管理员校验

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 业务错误的详情在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// 管理员校验中间件
///
/// 只读请求直接放行；其余请求需要 `role` 为 ADMIN 的 Bearer Token：
/// 缺失或无效返回 401，角色不符返回 403
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method();
    if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state
        .token_service
        .verify_header(header)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    if !claims.is_admin() {
        return Err(ApiError::Forbidden(format!(
            "Role {:?} may not modify content",
            claims.role
        )));
    }

    tracing::debug!(
        subject = %claims.sub,
        method = %request.method(),
        uri = %request.uri(),
        "Admin request authorized"
    );

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
