use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extract::bearer_token;
use crate::auth::{password, token, CurrentUser};
use crate::models::{User, UserRole};
use crate::repositories::{SessionRepository, UserRepository};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionPayload {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = password::hash_password(&req.password)?;
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .create(name, &email, &password_hash, UserRole::Attendee)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict(
                        "An account with this email already exists".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })?;

    let payload = issue_session(&state, user).await?;
    Ok(created(payload, "Account created").into_response())
}

pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    let users = UserRepository::new(state.pool.clone());

    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let payload = issue_session(&state, user).await?;
    Ok(success(payload, "Signed in").into_response())
}

pub async fn signout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::AuthError("Please sign in to continue".to_string()))?;

    let sessions = SessionRepository::new(state.pool.clone());
    sessions.revoke(&token::hash_token(token)).await?;

    Ok(empty_success("Successfully signed out").into_response())
}

pub async fn me(CurrentUser(user): CurrentUser) -> Response {
    success(user, "Session resolved").into_response()
}

async fn issue_session(state: &AppState, user: User) -> Result<SessionPayload, AppError> {
    let token = token::generate_token();
    let sessions = SessionRepository::new(state.pool.clone());
    let session = sessions
        .create(
            user.id,
            &token::hash_token(&token),
            state.config.session_ttl_hours,
        )
        .await?;

    Ok(SessionPayload {
        token,
        expires_at: session.expires_at,
        user,
    })
}
