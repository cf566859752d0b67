//! Premium subscription billing through Mercado Pago Checkout Pro.
//!
//! Checkout creates a preference whose `external_reference` carries the user
//! id; the success redirect and the webhook both confirm the payment against
//! the Mercado Pago API before activating premium, so a forged callback never
//! flips the flag.

pub mod client;
pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::UserRow;

use self::client::{
    BackUrls, PreferenceItem, PreferenceMetadata, PreferencePayer, PreferenceRequest,
};

pub const PREMIUM_ITEM_ID: &str = "premium_plan_monthly_01";
pub const PREMIUM_ITEM_TITLE: &str = "Plano Premium Mensal - Oráculo Cultural (R$ 1,00)";
pub const PREMIUM_UNIT_PRICE: f64 = 1.00;
pub const PREMIUM_PLAN_ID: &str = "premium_monthly";
pub const STATEMENT_DESCRIPTOR: &str = "ORACULO PREMIUM";

/// Builds the checkout preference for the monthly premium plan.
///
/// `metadata.preference_id` is a fresh UUID minted per checkout attempt, used
/// to correlate logs across the redirect and webhook paths.
pub fn premium_preference(user: &UserRow, config: &Config) -> PreferenceRequest {
    let base = config.base_url.trim_end_matches('/');
    PreferenceRequest {
        items: vec![PreferenceItem {
            id: PREMIUM_ITEM_ID.to_string(),
            title: PREMIUM_ITEM_TITLE.to_string(),
            quantity: 1,
            currency_id: "BRL".to_string(),
            unit_price: PREMIUM_UNIT_PRICE,
        }],
        payer: PreferencePayer {
            email: user.email.clone(),
            entity_type: "individual".to_string(),
        },
        back_urls: BackUrls {
            success: format!("{base}/api/v1/payments/success"),
            failure: format!("{base}/api/v1/payments/failure"),
            pending: format!("{base}/api/v1/payments/pending"),
        },
        auto_return: "approved".to_string(),
        external_reference: user.id.to_string(),
        notification_url: format!("{base}/api/v1/payments/webhook"),
        statement_descriptor: STATEMENT_DESCRIPTOR.to_string(),
        metadata: PreferenceMetadata {
            user_uid: user.id.to_string(),
            plan_id: PREMIUM_PLAN_ID.to_string(),
            preference_id: Uuid::new_v4().to_string(),
            payer_email: user.email.clone(),
        },
    }
}

/// Flips a user to premium. Idempotent; re-approval of a renewal simply
/// refreshes `premium_since`.
pub async fn activate_premium(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET premium = TRUE,
            premium_since = NOW(),
            premium_cancelled_at = NULL,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    info!("Premium activated for user {user_id}");
    Ok(())
}
