use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

use super::client::PaymentDetails;
use super::{activate_premium, premium_preference};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub preference_id: String,
    pub init_point: String,
    pub public_key: String,
}

/// Query parameters Mercado Pago appends to the back_urls. Older checkout
/// versions send `collection_id`/`collection_status` instead of
/// `payment_id`/`status`.
#[derive(Debug, Deserialize)]
pub struct RedirectParams {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub collection_status: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub preference_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub status: &'static str,
    pub premium_active: bool,
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/payments/checkout
///
/// Creates a Mercado Pago preference for the premium plan and returns the
/// `init_point` URL the client should send the payer to.
pub async fn handle_checkout(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let preference = premium_preference(&user, &state.config);
    let created = state
        .payments
        .create_preference(&preference)
        .await
        .map_err(|err| AppError::Payment(err.to_string()))?;

    info!("Created checkout preference {} for user {}", created.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            preference_id: created.id,
            init_point: created.init_point,
            public_key: state.config.mp_public_key.clone(),
        }),
    ))
}

/// GET /api/v1/payments/success
///
/// Landing for the approved back_url. The payment is re-read from the
/// Mercado Pago API before premium is activated; the query string alone is
/// never trusted. If the lookup fails the webhook finishes the activation.
pub async fn handle_payment_success(
    State(state): State<AppState>,
    Query(params): Query<RedirectParams>,
) -> Result<Json<RedirectResponse>, AppError> {
    let payment_id = params.payment_id.or(params.collection_id);

    let premium_active = match payment_id.as_deref() {
        Some(id) => match confirm_and_activate(&state, id).await {
            Ok(active) => active,
            Err(AppError::Payment(message)) => {
                warn!("Could not confirm payment {id} on the success redirect: {message}");
                false
            }
            Err(err) => return Err(err),
        },
        None => false,
    };

    let message = if premium_active {
        "Pagamento aprovado! Seu acesso Premium está ativo."
    } else {
        "Seu pagamento foi processado com sucesso. Seu acesso Premium será ativado em breve."
    };

    Ok(Json(RedirectResponse {
        status: "success",
        premium_active,
        message,
    }))
}

/// GET /api/v1/payments/failure
pub async fn handle_payment_failure(
    Query(params): Query<RedirectParams>,
) -> Json<RedirectResponse> {
    if let Some(id) = params.preference_id.or(params.payment_id) {
        info!("Checkout {id} came back through the failure redirect");
    }
    Json(RedirectResponse {
        status: "failure",
        premium_active: false,
        message: "Houve um problema ao processar seu pagamento. Nenhuma cobrança foi realizada.",
    })
}

/// GET /api/v1/payments/pending
pub async fn handle_payment_pending(
    Query(params): Query<RedirectParams>,
) -> Json<RedirectResponse> {
    if let Some(id) = params.preference_id.or(params.payment_id) {
        info!("Checkout {id} came back through the pending redirect");
    }
    Json(RedirectResponse {
        status: "pending",
        premium_active: false,
        message: "Seu pagamento está pendente de processamento. Assim que o pagamento for \
                  confirmado, seu plano será ativado.",
    })
}

/// POST /api/v1/payments/webhook
///
/// Mercado Pago notification endpoint. Unauthenticated; the payment is read
/// back from the API, so a fabricated notification cannot activate premium.
/// Errors return 5xx so Mercado Pago retries the delivery.
pub async fn handle_webhook(
    State(state): State<AppState>,
    Json(notification): Json<serde_json::Value>,
) -> Result<StatusCode, AppError> {
    let kind = notification
        .get("type")
        .and_then(|value| value.as_str())
        .or_else(|| notification.get("topic").and_then(|value| value.as_str()));

    if kind != Some("payment") {
        info!("Ignoring webhook notification of type {kind:?}");
        return Ok(StatusCode::OK);
    }

    let Some(payment_id) = webhook_payment_id(&notification) else {
        warn!("Payment webhook arrived without data.id; ignoring");
        return Ok(StatusCode::OK);
    };

    let activated = confirm_and_activate(&state, &payment_id).await?;
    info!("Webhook processed payment {payment_id} (premium activated: {activated})");
    Ok(StatusCode::OK)
}

/// Reads the payment from the Mercado Pago API and activates premium for the
/// user named in `external_reference` when the status is `approved`.
async fn confirm_and_activate(state: &AppState, payment_id: &str) -> Result<bool, AppError> {
    let payment = state
        .payments
        .get_payment(payment_id)
        .await
        .map_err(|err| AppError::Payment(err.to_string()))?;

    let Some(user_id) = activatable_user(payment_id, &payment) else {
        return Ok(false);
    };

    activate_premium(&state.db, user_id).await?;
    Ok(true)
}

/// The user a payment entitles to premium. `None` for anything short of an
/// approved payment with a well-formed `external_reference`.
fn activatable_user(payment_id: &str, payment: &PaymentDetails) -> Option<Uuid> {
    if payment.status != "approved" {
        info!(
            "Payment {payment_id} not approved (status: {}, detail: {:?})",
            payment.status, payment.status_detail
        );
        return None;
    }

    let Some(reference) = payment.external_reference.as_deref() else {
        warn!("Approved payment {payment_id} carries no external_reference; skipping activation");
        return None;
    };
    match Uuid::parse_str(reference) {
        Ok(id) => Some(id),
        Err(_) => {
            warn!("Approved payment {payment_id} has malformed external_reference '{reference}'");
            None
        }
    }
}

fn webhook_payment_id(notification: &serde_json::Value) -> Option<String> {
    match notification.get("data")?.get("id")? {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_payment_id_accepts_string_and_number() {
        let string_id = json!({"type": "payment", "data": {"id": "12345"}});
        assert_eq!(webhook_payment_id(&string_id), Some("12345".to_string()));

        let numeric_id = json!({"type": "payment", "data": {"id": 12345}});
        assert_eq!(webhook_payment_id(&numeric_id), Some("12345".to_string()));
    }

    #[test]
    fn test_webhook_payment_id_missing_data() {
        let no_data = json!({"type": "payment"});
        assert_eq!(webhook_payment_id(&no_data), None);

        let null_id = json!({"type": "payment", "data": {"id": null}});
        assert_eq!(webhook_payment_id(&null_id), None);
    }

    #[tokio::test]
    async fn test_failure_redirect_never_activates_premium() {
        // Even a query string claiming approval flips nothing on this path.
        let params: RedirectParams = serde_json::from_value(json!({
            "payment_id": "987654",
            "status": "approved",
            "collection_status": "approved",
            "external_reference": Uuid::new_v4().to_string(),
        }))
        .unwrap();

        let Json(response) = handle_payment_failure(Query(params)).await;
        assert_eq!(response.status, "failure");
        assert!(!response.premium_active);
    }

    #[tokio::test]
    async fn test_pending_redirect_never_activates_premium() {
        let params: RedirectParams = serde_json::from_value(json!({
            "payment_id": "987654",
            "collection_status": "approved",
        }))
        .unwrap();

        let Json(response) = handle_payment_pending(Query(params)).await;
        assert_eq!(response.status, "pending");
        assert!(!response.premium_active);
    }

    #[test]
    fn test_only_approved_payments_entitle_a_user() {
        let user_id = Uuid::new_v4();
        for status in ["pending", "in_process", "rejected", "cancelled", "refunded"] {
            let payment = PaymentDetails {
                status: status.to_string(),
                status_detail: None,
                external_reference: Some(user_id.to_string()),
            };
            assert_eq!(activatable_user("42", &payment), None, "status {status}");
        }

        let approved = PaymentDetails {
            status: "approved".to_string(),
            status_detail: Some("accredited".to_string()),
            external_reference: Some(user_id.to_string()),
        };
        assert_eq!(activatable_user("42", &approved), Some(user_id));
    }

    #[test]
    fn test_approved_payment_without_valid_reference_entitles_nobody() {
        let missing = PaymentDetails {
            status: "approved".to_string(),
            status_detail: None,
            external_reference: None,
        };
        assert_eq!(activatable_user("42", &missing), None);

        let malformed = PaymentDetails {
            status: "approved".to_string(),
            status_detail: None,
            external_reference: Some("pedido-1234".to_string()),
        };
        assert_eq!(activatable_user("42", &malformed), None);
    }

    #[test]
    fn test_redirect_params_tolerate_missing_fields() {
        let params: RedirectParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.payment_id.is_none());
        assert!(params.collection_id.is_none());

        let params: RedirectParams =
            serde_json::from_value(json!({"collection_id": "777", "collection_status": "approved"}))
                .unwrap();
        assert_eq!(params.payment_id.or(params.collection_id).as_deref(), Some("777"));
    }
}
