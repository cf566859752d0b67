//! Axum route handlers for document generation and saving.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::documents::{generate_document, DocumentKind};
use crate::errors::AppError;
use crate::models::project::ProjectRow;
use crate::models::user::UserRow;
use crate::projects::load_owned_project;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub kind: DocumentKind,
}

#[derive(Debug, Serialize)]
pub struct GenerateDocumentResponse {
    pub kind: DocumentKind,
    pub name: &'static str,
    /// Raw LLM output, returned for review without being saved.
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveDocumentRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/projects/:id/documents
pub async fn handle_generate_document(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<GenerateDocumentResponse>, AppError> {
    let project = load_owned_project(&state.db, project_id, user.id).await?;

    if project.project_text.trim().is_empty() {
        return Err(AppError::Validation(
            "O texto do projeto está vazio. Escreva ou importe o texto antes de continuar."
                .to_string(),
        ));
    }

    let text = generate_document(
        &state.llm,
        request.kind,
        &project.project_text,
        project.diagnosis.as_deref(),
    )
    .await?;

    info!(
        "Generated {} for project {}",
        request.kind.slug(),
        project.id
    );

    Ok(Json(GenerateDocumentResponse {
        kind: request.kind,
        name: request.kind.display_name(),
        text,
    }))
}

/// PUT /api/v1/projects/:id/documents/:kind
///
/// Saves the reviewed text into the project's documents map.
pub async fn handle_save_document(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path((project_id, kind_slug)): Path<(Uuid, String)>,
    Json(request): Json<SaveDocumentRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    let kind = DocumentKind::from_slug(&kind_slug)
        .ok_or_else(|| AppError::NotFound("Tipo de documento desconhecido.".to_string()))?;

    let project = load_owned_project(&state.db, project_id, user.id).await?;

    let mut documents = project.documents.0.clone();
    documents.insert(kind.slug().to_string(), request.text);

    let updated = sqlx::query_as::<_, ProjectRow>(
        "UPDATE projects SET documents = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(project.id)
    .bind(SqlJson(&documents))
    .fetch_one(&state.db)
    .await?;

    info!("Saved {} on project {}", kind.slug(), project.id);

    Ok(Json(updated))
}
