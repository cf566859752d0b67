//! Axum route handlers for project CRUD, text saving and import.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::{Extension, Json};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::editais::edital_exists;
use crate::errors::AppError;
use crate::loaders;
use crate::models::project::{is_valid_category, ProjectRow, ProjectSummary};
use crate::models::user::UserRow;
use crate::projects::{load_owned_project, normalize_line_breaks};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub edital_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `"edital_id": null` unlinks the edital; an absent field leaves the
    /// link unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub edital_id: Option<Option<Uuid>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Extracted text after paragraph-break normalization, for review.
    pub text: String,
    pub characters: usize,
}

/// Keeps `null` distinguishable from an absent field.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    let name = request.name.trim().to_string();
    let description = request.description.trim().to_string();

    if name.is_empty() || description.is_empty() || request.category.trim().is_empty() {
        return Err(AppError::Validation(
            "Por favor, preencha todos os campos obrigatórios (*).".to_string(),
        ));
    }
    if !is_valid_category(&request.category) {
        return Err(AppError::Validation("Categoria inválida.".to_string()));
    }
    if let Some(edital_id) = request.edital_id {
        if !edital_exists(&state.db, edital_id).await? {
            return Err(AppError::NotFound("Edital não encontrado.".to_string()));
        }
    }

    let project = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (id, user_id, name, description, category, edital_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&name)
    .bind(&description)
    .bind(&request.category)
    .bind(request.edital_id)
    .fetch_one(&state.db)
    .await?;

    info!("User {} created project {}", user.id, project.id);

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
) -> Result<Json<Vec<ProjectSummary>>, AppError> {
    let projects = sqlx::query_as::<_, ProjectSummary>(
        r#"
        SELECT id, name, description, category, edital_id, created_at, updated_at
        FROM projects
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(projects))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectRow>, AppError> {
    let project = load_owned_project(&state.db, project_id, user.id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    let mut project = load_owned_project(&state.db, project_id, user.id).await?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation(
                "O nome do projeto não pode ficar vazio.".to_string(),
            ));
        }
        project.name = name;
    }
    if let Some(description) = request.description {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::Validation(
                "A descrição do projeto não pode ficar vazia.".to_string(),
            ));
        }
        project.description = description;
    }
    if let Some(category) = request.category {
        if !is_valid_category(&category) {
            return Err(AppError::Validation("Categoria inválida.".to_string()));
        }
        project.category = category;
    }
    if let Some(edital_id) = request.edital_id {
        if let Some(id) = edital_id {
            if !edital_exists(&state.db, id).await? {
                return Err(AppError::NotFound("Edital não encontrado.".to_string()));
            }
        }
        project.edital_id = edital_id;
    }
    if let Some(notes) = request.notes {
        project.notes = notes;
    }

    let updated = sqlx::query_as::<_, ProjectRow>(
        r#"
        UPDATE projects
        SET name = $2, description = $3, category = $4, edital_id = $5, notes = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(&project.category)
    .bind(project.edital_id)
    .bind(&project.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(project_id)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Projeto não encontrado.".to_string()));
    }

    info!("User {} deleted project {project_id}", user.id);

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/projects/:id/text
///
/// Stores the body exactly as sent. No trimming, no break normalization:
/// what the user saves is what every later read returns.
pub async fn handle_save_project_text(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
    Json(request): Json<SaveTextRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    load_owned_project(&state.db, project_id, user.id).await?;

    let updated = sqlx::query_as::<_, ProjectRow>(
        "UPDATE projects SET project_text = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(project_id)
    .bind(&request.text)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// POST /api/v1/projects/:id/import
///
/// Accepts either a multipart upload (`file` field, PDF/CSV/TXT) or a JSON
/// body `{url}`. Returns the extracted text for review; the project is not
/// modified until the user saves.
pub async fn handle_import_project_text(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    Path(project_id): Path<Uuid>,
    req: Request,
) -> Result<Json<ImportResponse>, AppError> {
    load_owned_project(&state.db, project_id, user.id).await?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let raw = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|_| AppError::Validation("Envio multipart inválido.".to_string()))?;

        let mut extracted = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| AppError::Validation("Envio multipart inválido.".to_string()))?
        {
            if field.name() == Some("file") {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Arquivo inválido.".to_string()))?;
                extracted = Some(loaders::extract_file_text(&filename, &bytes)?);
                break;
            }
        }
        extracted.ok_or_else(|| AppError::Validation("Nenhum arquivo enviado.".to_string()))?
    } else {
        let Json(body): Json<ImportUrlRequest> = Json::from_request(req, &state)
            .await
            .map_err(|_| AppError::Validation("Informe a URL do site.".to_string()))?;
        loaders::web::fetch_url_text(&state.http, body.url.trim()).await?
    };

    let text = normalize_line_breaks(&raw);
    let characters = text.chars().count();

    Ok(Json(ImportResponse { text, characters }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_text_body_keeps_every_byte() {
        // The save path stores this string as-is; CRLF, tabs, trailing
        // spaces and non-breaking spaces must survive deserialization.
        let text = "linha um\r\nlinha dois\n\n\tcom tab  \u{00a0}e NBSP\r";
        let body = serde_json::to_string(&serde_json::json!({ "text": text })).unwrap();
        let request: SaveTextRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.text, text);
    }

    #[test]
    fn test_patch_body_distinguishes_null_from_absent() {
        let absent: UpdateProjectRequest = serde_json::from_str(r#"{"name":"Novo"}"#).unwrap();
        assert_eq!(absent.edital_id, None);

        let cleared: UpdateProjectRequest = serde_json::from_str(r#"{"edital_id":null}"#).unwrap();
        assert_eq!(cleared.edital_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateProjectRequest =
            serde_json::from_str(&format!(r#"{{"edital_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.edital_id, Some(Some(id)));
    }
}
