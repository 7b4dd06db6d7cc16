//! Session token extractor.
//!
//! Every data route runs on behalf of a signed-in user; the user id and
//! email come from the Bearer token.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::CurrentUser;
use shared::jwt::{extract_user_id, JwtError};

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated user, read from the Authorization header.
#[derive(Debug, Clone)]
pub struct UserAuth(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        })?;

        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(UserAuth(CurrentUser::new(user_id, claims.email)))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
