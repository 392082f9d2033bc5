//! Request extractors implementing the authorization gate.
//!
//! `CurrentUser` resolves the bearer token against the sessions table with a
//! revocation-checked lookup; `AdminUser` additionally requires the admin
//! role claim. Handlers that take these extractors never run for anonymous
//! or under-privileged callers, so protected data is never rendered for them.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::token;
use crate::models::User;
use crate::repositories::SessionRepository;
use crate::state::AppState;
use crate::utils::error::AppError;

const SIGN_IN_MESSAGE: &str = "Please sign in to continue";
const ACCESS_DENIED_MESSAGE: &str = "Access denied. Admin only area.";

/// Any authenticated user.
pub struct CurrentUser(pub User);

/// An authenticated user holding the admin role claim.
pub struct AdminUser(pub User);

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::AuthError(SIGN_IN_MESSAGE.to_string()))?;

        let token_hash = token::hash_token(token);
        let sessions = SessionRepository::new(state.pool.clone());
        let user = sessions
            .find_active_user(&token_hash)
            .await?
            .ok_or_else(|| AppError::AuthError(SIGN_IN_MESSAGE.to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden(ACCESS_DENIED_MESSAGE.to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_yields_none() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn empty_bearer_token_yields_none() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
