use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{types::app_state::AppState, utils::app_error::AppError};

/// Accepts either the bare key or `Bearer <key>` in `Authorization`. With no
/// key configured every request passes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(ref auth_key) = state.auth_key else {
        return Ok(next.run(request).await);
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h));

    match presented {
        Some(key) if key == auth_key => Ok(next.run(request).await),
        _ => Err(AppError::new(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}
