//! Minimal Mercado Pago REST client: create a checkout preference, read a
//! payment back. Only the fields this app consumes are modeled.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MP_API_BASE: &str = "https://api.mercadopago.com";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mercado Pago API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer: PreferencePayer,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub notification_url: String,
    pub statement_descriptor: String,
    pub metadata: PreferenceMetadata,
}

#[derive(Debug, Serialize)]
pub struct PreferenceItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub currency_id: String,
    pub unit_price: f64,
}

#[derive(Debug, Serialize)]
pub struct PreferencePayer {
    pub email: String,
    pub entity_type: String,
}

#[derive(Debug, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Serialize)]
pub struct PreferenceMetadata {
    pub user_uid: String,
    pub plan_id: String,
    pub preference_id: String,
    pub payer_email: String,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceResponse {
    pub id: String,
    /// Checkout URL the payer is sent to.
    pub init_point: String,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentDetails {
    pub status: String,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MpErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl MercadoPagoClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
            base_url: MP_API_BASE.to_string(),
        }
    }

    pub async fn create_preference(
        &self,
        preference: &PreferenceRequest,
    ) -> Result<PreferenceResponse, PaymentError> {
        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.base_url))
            .bearer_auth(&self.access_token)
            .json(preference)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        Ok(response.json::<PreferenceResponse>().await?)
    }

    pub async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, PaymentError> {
        let response = self
            .client
            .get(format!("{}/v1/payments/{payment_id}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        Ok(response.json::<PaymentDetails>().await?)
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> PaymentError {
        let message = match response.json::<MpErrorBody>().await {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_else(|| "unknown error".to_string()),
            Err(_) => "unknown error".to_string(),
        };
        PaymentError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_details_parse_with_missing_reference() {
        let details: PaymentDetails =
            serde_json::from_str(r#"{"status": "approved", "status_detail": "accredited"}"#)
                .unwrap();
        assert_eq!(details.status, "approved");
        assert_eq!(details.external_reference, None);
    }

    #[test]
    fn test_preference_response_parses_mp_shape() {
        let json = r#"{
            "id": "123456789-abcd",
            "init_point": "https://www.mercadopago.com.br/checkout/v1/redirect?pref_id=123",
            "sandbox_init_point": "https://sandbox.mercadopago.com.br/checkout/v1/redirect?pref_id=123",
            "collector_id": 999
        }"#;
        let response: PreferenceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "123456789-abcd");
        assert!(response.init_point.contains("mercadopago"));
    }
}
