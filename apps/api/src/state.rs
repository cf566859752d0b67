use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::payments::client::MercadoPagoClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis client backing the editais listing cache.
    pub redis: RedisClient,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub payments: MercadoPagoClient,
    /// Plain HTTP client used by the web loader when importing from a URL.
    pub http: reqwest::Client,
    pub config: Config,
}
