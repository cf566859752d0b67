//! Axum route handlers for profile and subscription state.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Premium is billed in 30-day cycles; renewal is counted from upgrade.
const PREMIUM_CYCLE_DAYS: i64 = 30;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: String,
    /// Display label used by the profile screen.
    pub status: String,
    pub premium: bool,
    pub trial_days_remaining: i64,
    pub member_since: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub premium: bool,
    pub trial_days_remaining: i64,
    pub premium_since: Option<DateTime<Utc>>,
    pub next_renewal: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl SubscriptionResponse {
    fn from_user(user: &UserRow, now: DateTime<Utc>) -> Self {
        let next_renewal = if user.premium {
            user.premium_since
                .map(|since| since + Duration::days(PREMIUM_CYCLE_DAYS))
        } else {
            None
        };
        Self {
            premium: user.premium,
            trial_days_remaining: user.trial_days_remaining(now).max(0),
            premium_since: user.premium_since,
            next_renewal,
            cancelled_at: user.premium_cancelled_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_profile(
    Extension(user): Extension<UserRow>,
) -> Result<Json<ProfileResponse>, AppError> {
    let status = if user.premium {
        "Premium ✨".to_string()
    } else {
        "Gratuito".to_string()
    };

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        company: user.company.clone(),
        status,
        premium: user.premium,
        trial_days_remaining: user.trial_days_remaining(Utc::now()).max(0),
        member_since: user.created_at,
        last_login_at: user.last_login_at,
    }))
}

/// GET /api/v1/subscription
pub async fn handle_subscription(
    Extension(user): Extension<UserRow>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    Ok(Json(SubscriptionResponse::from_user(&user, Utc::now())))
}

/// POST /api/v1/subscription/cancel
///
/// Drops the premium flag immediately. The Mercado Pago side holds no
/// recurring mandate, so nothing to revoke there.
pub async fn handle_cancel_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let updated = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET premium = FALSE, premium_cancelled_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.id)
    .fetch_one(&state.db)
    .await?;

    info!("User {} cancelled the premium plan", user.id);

    Ok(Json(SubscriptionResponse::from_user(&updated, Utc::now())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn premium_user(since_days_ago: i64) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            email: "p@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "P".to_string(),
            company: String::new(),
            premium: true,
            premium_since: Some(now - Duration::days(since_days_ago)),
            premium_cancelled_at: None,
            created_at: now - Duration::days(90),
            last_login_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_next_renewal_is_thirty_days_after_upgrade() {
        let user = premium_user(10);
        let response = SubscriptionResponse::from_user(&user, Utc::now());
        let expected = user.premium_since.unwrap() + Duration::days(30);
        assert_eq!(response.next_renewal, Some(expected));
    }

    #[test]
    fn test_free_account_has_no_renewal() {
        let now = Utc::now();
        let mut user = premium_user(10);
        user.premium = false;
        let response = SubscriptionResponse::from_user(&user, now);
        assert_eq!(response.next_renewal, None);
        assert!(!response.premium);
    }
}
