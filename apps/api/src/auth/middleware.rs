//! Request guards. `require_auth` resolves the session cookie to a
//! `UserRow` and stores it in request extensions; `require_active_plan`
//! then blocks accounts whose trial ended without an upgrade.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use chrono::Utc;

use crate::auth::sessions;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let session_id =
        sessions::session_id_from_cookies(cookie_header).ok_or(AppError::Unauthorized)?;

    let user = sessions::user_for_session(&state.db, session_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

pub async fn require_active_plan(
    Extension(user): Extension<UserRow>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.has_active_plan(Utc::now()) {
        return Err(AppError::TrialExpired);
    }
    Ok(next.run(req).await)
}
