use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Number of days a freshly registered account may use the app before
/// upgrading to premium.
pub const TRIAL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub company: String,
    pub premium: bool,
    pub premium_since: Option<DateTime<Utc>>,
    pub premium_cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Days of trial left, counted from registration. Negative once expired.
    pub fn trial_days_remaining(&self, now: DateTime<Utc>) -> i64 {
        TRIAL_DAYS - (now - self.created_at).num_days()
    }

    /// Premium accounts are always active; free accounts only inside the
    /// trial window.
    pub fn has_active_plan(&self, now: DateTime<Utc>) -> bool {
        self.premium || self.trial_days_remaining(now) > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(premium: bool, registered_days_ago: i64) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            email: "maria@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Maria".to_string(),
            company: String::new(),
            premium,
            premium_since: None,
            premium_cancelled_at: None,
            created_at: now - Duration::days(registered_days_ago),
            last_login_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_fresh_account_has_full_trial() {
        let u = user(false, 0);
        assert_eq!(u.trial_days_remaining(Utc::now()), TRIAL_DAYS);
        assert!(u.has_active_plan(Utc::now()));
    }

    #[test]
    fn test_trial_expires_after_seven_days() {
        let u = user(false, 7);
        assert!(u.trial_days_remaining(Utc::now()) <= 0);
        assert!(!u.has_active_plan(Utc::now()));
    }

    #[test]
    fn test_premium_ignores_trial_window() {
        let u = user(true, 30);
        assert!(u.has_active_plan(Utc::now()));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(user(false, 1)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("email").is_some());
    }
}
