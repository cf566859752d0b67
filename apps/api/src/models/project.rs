use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The fixed category list offered by the project creation form.
pub const PROJECT_CATEGORIES: [&str; 10] = [
    "Artes Visuais",
    "Música",
    "Teatro",
    "Dança",
    "Cinema e Audiovisual",
    "Literatura e Publicações",
    "Patrimônio Cultural",
    "Artesanato",
    "Cultura Popular",
    "Outra",
];

pub fn is_valid_category(category: &str) -> bool {
    PROJECT_CATEGORIES.contains(&category)
}

/// One AI-proposed edit to the project text, parsed from the fixed
/// `[SUGESTÃO N]` block format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub number: u32,
    pub original_excerpt: String,
    pub change_summary: String,
    pub new_text: String,
    #[serde(default)]
    pub applied: bool,
}

/// Listing projection. Leaves the heavy text columns behind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub edital_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub edital_id: Option<Uuid>,
    pub project_text: String,
    pub diagnosis: Option<String>,
    pub notes: String,
    /// Generated document texts keyed by document-type slug.
    pub documents: Json<HashMap<String, String>>,
    pub suggestions: Json<Vec<Suggestion>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
