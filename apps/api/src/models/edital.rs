use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EditalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub edital_text: String,
    /// Text extracted from the optional "projetos selecionados" study PDF.
    pub selected_projects_text: Option<String>,
    /// As extracted by the LLM, DD/MM/YYYY. Empty when not found.
    pub registration_date: String,
    pub categories: Vec<String>,
    pub required_texts: Vec<String>,
    pub required_documents: Vec<String>,
    pub s3_pdf_key: Option<String>,
    pub s3_selected_pdf_key: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection, small enough to cache in Redis as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EditalSummary {
    pub id: Uuid,
    pub name: String,
    pub registration_date: String,
    pub categories: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}
