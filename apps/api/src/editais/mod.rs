//! Edital catalog: PDF upload with text extraction, LLM metadata
//! extraction and a Redis-cached listing. Editais are shared across
//! accounts; `user_id` records who uploaded them.

pub mod cache;
pub mod extraction;
pub mod handlers;
pub mod prompts;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::edital::EditalRow;

pub async fn edital_exists(pool: &PgPool, edital_id: Uuid) -> Result<bool, AppError> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM editais WHERE id = $1)")
        .bind(edital_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn load_edital(pool: &PgPool, edital_id: Uuid) -> Result<EditalRow, AppError> {
    sqlx::query_as::<_, EditalRow>("SELECT * FROM editais WHERE id = $1")
        .bind(edital_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Edital não encontrado.".to_string()))
}
