use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::error::AppError;

/// Identity decoded from the bearer token, attached to the request
/// extensions for protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

/// Authentication middleware - validates bearer tokens.
/// A missing or malformed header is 401; a present but invalid, expired,
/// or mis-signed token is 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format".to_string()))?;

    let claims = state.keys.verify(token)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Creator-only mutation policy, shared by every mutating ticket route.
pub fn ensure_owner(owner_id: &str, user: &AuthUser) -> Result<(), AppError> {
    if owner_id != user.id {
        return Err(AppError::Forbidden(
            "Only the creator may modify this ticket".to_string(),
        ));
    }
    Ok(())
}
