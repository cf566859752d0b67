//! Axum route handlers for diagnosis and suggestions.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::diagnosis::{prompts, run_diagnosis, PROJECT_PROMPT_BUDGET};
use crate::diagnosis::suggestions::{apply_suggestion, parse_suggestions};
use crate::editais::load_edital;
use crate::errors::AppError;
use crate::llm_client::prompts::CULTURAL_ADVISOR_SYSTEM;
use crate::llm_client::truncate_chars;
use crate::models::project::{ProjectRow, Suggestion};
use crate::models::user::UserRow;
use crate::projects::load_owned_project;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub diagnosis: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/projects/:id/diagnosis
///
/// Needs a saved project text and an associated edital. The result
/// replaces any previously stored diagnosis.
pub async fn handle_generate_diagnosis(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let project = load_owned_project(&state.db, project_id, user.id).await?;

    if project.project_text.trim().is_empty() {
        return Err(AppError::Validation(
            "O texto do projeto está vazio. Escreva ou importe o texto antes de continuar."
                .to_string(),
        ));
    }
    let Some(edital_id) = project.edital_id else {
        return Err(AppError::Validation(
            "Associe um edital ao projeto antes de gerar o diagnóstico.".to_string(),
        ));
    };
    let edital = load_edital(&state.db, edital_id).await?;

    let diagnosis = run_diagnosis(&state.llm, &project.project_text, &edital).await?;

    sqlx::query("UPDATE projects SET diagnosis = $2, updated_at = NOW() WHERE id = $1")
        .bind(project.id)
        .bind(&diagnosis)
        .execute(&state.db)
        .await?;

    info!("Generated diagnosis for project {}", project.id);

    Ok(Json(DiagnosisResponse { diagnosis }))
}

/// POST /api/v1/projects/:id/suggestions
///
/// One LLM call; whatever parses out of the answer replaces the stored
/// suggestion list.
pub async fn handle_generate_suggestions(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let project = load_owned_project(&state.db, project_id, user.id).await?;

    if project.project_text.trim().is_empty() {
        return Err(AppError::Validation(
            "O texto do projeto está vazio. Escreva ou importe o texto antes de continuar."
                .to_string(),
        ));
    }

    let prompt = prompts::SUGGESTIONS_TEMPLATE.replace(
        "{projeto}",
        truncate_chars(&project.project_text, PROJECT_PROMPT_BUDGET),
    );
    let response = state
        .llm
        .call_text(&prompt, CULTURAL_ADVISOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let suggestions = parse_suggestions(&response);

    sqlx::query("UPDATE projects SET suggestions = $2, updated_at = NOW() WHERE id = $1")
        .bind(project.id)
        .bind(SqlJson(&suggestions))
        .execute(&state.db)
        .await?;

    info!(
        "Stored {} suggestion(s) for project {}",
        suggestions.len(),
        project.id
    );

    Ok(Json(SuggestionsResponse { suggestions }))
}

/// POST /api/v1/projects/:id/suggestions/:number/apply
///
/// Applies one stored suggestion to the project text and marks it applied.
pub async fn handle_apply_suggestion(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path((project_id, number)): Path<(Uuid, u32)>,
) -> Result<Json<ProjectRow>, AppError> {
    let project = load_owned_project(&state.db, project_id, user.id).await?;

    let mut suggestions = project.suggestions.0.clone();
    let Some(index) = suggestions.iter().position(|s| s.number == number) else {
        return Err(AppError::NotFound("Sugestão não encontrada.".to_string()));
    };

    let new_text = apply_suggestion(&project.project_text, &suggestions[index])?;
    suggestions[index].applied = true;

    let updated = sqlx::query_as::<_, ProjectRow>(
        r#"
        UPDATE projects
        SET project_text = $2, suggestions = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(project.id)
    .bind(&new_text)
    .bind(SqlJson(&suggestions))
    .fetch_one(&state.db)
    .await?;

    info!("Applied suggestion {number} on project {}", project.id);

    Ok(Json(updated))
}
