//! Axum route handlers for account management.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{passwords, sessions};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Validity window for password reset tokens.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub company: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: String,
    pub premium: bool,
    pub trial_days_remaining: i64,
}

impl AuthResponse {
    fn from_user(user: &UserRow) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            company: user.company.clone(),
            premium: user.premium,
            trial_days_remaining: user.trial_days_remaining(Utc::now()).max(0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub reset_token: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordConfirmRequest {
    pub token: Uuid,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordConfirmResponse {
    pub updated: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
///
/// Creates the account, opens a session and sets the session cookie, so a
/// fresh signup lands already logged in.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = request.name.trim().to_string();
    let email = request.email.trim().to_lowercase();

    if name.is_empty()
        || email.is_empty()
        || request.password.is_empty()
        || request.password_confirm.is_empty()
    {
        return Err(AppError::Validation(
            "Por favor, preencha todos os campos obrigatórios (Email, Nome, Senha, Repetir Senha)."
                .to_string(),
        ));
    }
    if !is_plausible_email(&email) {
        return Err(AppError::Validation(
            "Por favor, digite um email válido.".to_string(),
        ));
    }
    passwords::validate_new_password(&request.password, &request.password_confirm)?;

    let password_hash = passwords::hash_password(&request.password)?;

    // User row and first session commit together, so a half-registered
    // account can never exist.
    let mut tx = state.db.begin().await?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, name, company)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&password_hash)
    .bind(&name)
    .bind(request.company.trim())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
            "Este email já está cadastrado. Tente fazer login ou use um email diferente."
                .to_string(),
        ),
        _ => AppError::from(e),
    })?;

    let session = sessions::create_session(&mut *tx, user.id).await?;

    tx.commit().await?;

    info!("Registered user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, sessions::session_cookie(session.id))],
        Json(AuthResponse::from_user(&user)),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = request.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !passwords::verify_password(&request.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let session = sessions::create_session(&state.db, user.id).await?;

    Ok((
        [(header::SET_COOKIE, sessions::session_cookie(session.id))],
        Json(AuthResponse::from_user(&user)),
    ))
}

/// POST /api/v1/auth/logout
///
/// Best effort: an absent or unknown cookie still clears client state.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session_id = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(sessions::session_id_from_cookies);

    if let Some(session_id) = session_id {
        sessions::delete_session(&state.db, session_id).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, sessions::clear_session_cookie())],
    ))
}

/// POST /api/v1/auth/reset-password
///
/// There is no mail delivery in the API tier; the token is returned to the
/// caller, which owns how it reaches the user.
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    let email = request.email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        return Err(AppError::Validation(
            "Por favor, digite um email válido.".to_string(),
        ));
    }

    let user_id: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    let (user_id,) = user_id.ok_or_else(|| {
        AppError::NotFound("Nenhum usuário encontrado com este endereço de e-mail.".to_string())
    })?;

    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

    sqlx::query("INSERT INTO password_resets (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&state.db)
        .await?;

    info!("Issued password reset token for user {user_id}");

    Ok(Json(ResetPasswordResponse {
        reset_token: token,
        expires_at,
    }))
}

/// POST /api/v1/auth/reset-password/confirm
///
/// Consumes the token, rewrites the hash and revokes every open session of
/// the account in one transaction.
pub async fn handle_reset_password_confirm(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordConfirmRequest>,
) -> Result<Json<ResetPasswordConfirmResponse>, AppError> {
    passwords::validate_new_password(&request.password, &request.password_confirm)?;
    let password_hash = passwords::hash_password(&request.password)?;

    let mut tx = state.db.begin().await?;

    let reset: Option<(Uuid,)> = sqlx::query_as(
        "SELECT user_id FROM password_resets WHERE token = $1 AND expires_at > NOW()",
    )
    .bind(request.token)
    .fetch_optional(&mut *tx)
    .await?;
    let (user_id,) = reset.ok_or_else(|| {
        AppError::UnprocessableEntity("Token de recuperação inválido ou expirado.".to_string())
    })?;

    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sessions::delete_sessions_for_user(&mut *tx, user_id).await?;

    tx.commit().await?;

    info!("Password reset completed for user {user_id}");

    Ok(Json(ResetPasswordConfirmResponse { updated: true }))
}

/// Cheap shape check, enough to catch obvious typos before touching the
/// database. Full address validation is not attempted.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_plausibility() {
        assert!(is_plausible_email("maria@example.com"));
        assert!(is_plausible_email("produtor.cultural@sp.gov.br"));
        assert!(!is_plausible_email("maria"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("maria@localhost"));
    }

    #[test]
    fn test_auth_response_clamps_expired_trial_to_zero() {
        let user = UserRow {
            id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "X".to_string(),
            company: String::new(),
            premium: false,
            premium_since: None,
            premium_cancelled_at: None,
            created_at: Utc::now() - Duration::days(30),
            last_login_at: None,
            updated_at: Utc::now(),
        };
        let response = AuthResponse::from_user(&user);
        assert_eq!(response.trial_days_remaining, 0);
        assert!(!response.premium);
    }
}
