//! Database-backed sessions identified by an opaque UUID carried in an
//! HttpOnly cookie.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SessionRow, UserRow};

pub const SESSION_TTL_DAYS: i64 = 30;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Builds the Set-Cookie value for a fresh session.
pub fn session_cookie(session_id: Uuid) -> String {
    format!(
        "{SESSION_COOKIE_NAME}={session_id}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    )
}

/// Builds the Set-Cookie value that expires the session cookie on logout.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0")
}

/// Pulls the session id out of a raw `Cookie:` header value.
pub fn session_id_from_cookies(cookie_header: &str) -> Option<Uuid> {
    cookie_header
        .split(';')
        .find_map(|part| part.trim().strip_prefix("session="))
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

pub async fn create_session<'e, E>(executor: E, user_id: Uuid) -> Result<SessionRow, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let session = sqlx::query_as::<_, SessionRow>(
        "INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Utc::now() + Duration::days(SESSION_TTL_DAYS))
    .fetch_one(executor)
    .await?;

    Ok(session)
}

/// Resolves a session id to its user. Expired sessions resolve to `None`.
pub async fn user_for_session(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.*
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &PgPool, session_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drops every session of a user. Used after a password reset so stolen
/// cookies stop working.
pub async fn delete_sessions_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_carries_session_id_and_attributes() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id);
        assert!(cookie.starts_with(&format!("session={id}; ")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_session_id_parses_among_other_cookies() {
        let id = Uuid::new_v4();
        let header = format!("theme=dark; session={id}; lang=pt-BR");
        assert_eq!(session_id_from_cookies(&header), Some(id));
    }

    #[test]
    fn test_missing_or_malformed_session_yields_none() {
        assert_eq!(session_id_from_cookies("theme=dark"), None);
        assert_eq!(session_id_from_cookies("session=not-a-uuid"), None);
    }
}
