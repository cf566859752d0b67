//! Axum route handlers for the edital catalog.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::editais::extraction::extract_edital_info;
use crate::editais::{cache, load_edital};
use crate::errors::AppError;
use crate::loaders;
use crate::models::edital::{EditalRow, EditalSummary};
use crate::models::user::UserRow;
use crate::state::AppState;
use crate::storage;

/// Multipart fields accepted by create and update.
struct EditalUploadForm {
    name: Option<String>,
    edital_pdf: Option<Bytes>,
    selected_pdf: Option<Bytes>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<EditalUploadForm, AppError> {
    let mut form = EditalUploadForm {
        name: None,
        edital_pdf: None,
        selected_pdf: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Envio multipart inválido.".to_string()))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Envio multipart inválido.".to_string()))?;
                form.name = Some(value.trim().to_string());
            }
            Some("edital_pdf") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Arquivo inválido.".to_string()))?;
                form.edital_pdf = Some(bytes);
            }
            Some("selected_pdf") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Arquivo inválido.".to_string()))?;
                form.selected_pdf = Some(bytes);
            }
            _ => {}
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editais
///
/// Multipart: `name`, `edital_pdf` (required), `selected_pdf` (optional).
/// Text extraction runs before any side effect so an unreadable required
/// PDF fails the upload cleanly. LLM metadata extraction degrades to empty
/// fields instead of failing.
pub async fn handle_create_edital(
    State(state): State<AppState>,
    Extension(user): Extension<UserRow>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EditalRow>), AppError> {
    let form = read_upload_form(multipart).await?;

    let name = form.name.unwrap_or_default();
    let edital_pdf = match form.edital_pdf {
        Some(bytes) if !name.is_empty() => bytes,
        _ => {
            return Err(AppError::Validation(
                "Por favor, preencha o nome do edital e carregue o arquivo PDF obrigatório."
                    .to_string(),
            ))
        }
    };

    let edital_text = loaders::pdf::extract_pdf_text(&edital_pdf)?;

    // The companion PDF is optional context; unreadable input is dropped
    // rather than blocking the upload.
    let (selected_pdf, selected_text) = match form.selected_pdf {
        Some(bytes) => match loaders::pdf::extract_pdf_text(&bytes) {
            Ok(text) => (Some(bytes), Some(text)),
            Err(e) => {
                warn!("Selected-projects PDF unreadable, ignoring it: {e}");
                (None, None)
            }
        },
        None => (None, None),
    };

    let edital_id = Uuid::new_v4();

    let pdf_key = storage::edital_pdf_key(edital_id);
    storage::put_pdf(
        &state.s3,
        &state.config.s3_bucket,
        &pdf_key,
        edital_pdf.to_vec(),
    )
    .await?;

    let mut selected_key = None;
    if let Some(bytes) = &selected_pdf {
        let key = storage::selected_pdf_key(edital_id);
        storage::put_pdf(&state.s3, &state.config.s3_bucket, &key, bytes.to_vec()).await?;
        selected_key = Some(key);
    }

    let metadata = extract_edital_info(&state.llm, &edital_text).await;

    let edital = sqlx::query_as::<_, EditalRow>(
        r#"
        INSERT INTO editais
            (id, user_id, name, edital_text, selected_projects_text, registration_date,
             categories, required_texts, required_documents, s3_pdf_key, s3_selected_pdf_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(edital_id)
    .bind(user.id)
    .bind(&name)
    .bind(&edital_text)
    .bind(&selected_text)
    .bind(&metadata.data_inscricao)
    .bind(&metadata.categorias)
    .bind(&metadata.textos_requeridos)
    .bind(&metadata.documentos_requeridos)
    .bind(&pdf_key)
    .bind(&selected_key)
    .fetch_one(&state.db)
    .await?;

    cache::invalidate_listing(&state.redis).await;

    info!("User {} registered edital {} ({})", user.id, edital.id, edital.name);

    Ok((StatusCode::CREATED, Json(edital)))
}

/// GET /api/v1/editais
pub async fn handle_list_editais(
    State(state): State<AppState>,
) -> Result<Json<Vec<EditalSummary>>, AppError> {
    if let Some(cached) = cache::get_cached_listing(&state.redis).await {
        return Ok(Json(cached));
    }

    let listing = sqlx::query_as::<_, EditalSummary>(
        r#"
        SELECT id, name, registration_date, categories, uploaded_at
        FROM editais
        ORDER BY uploaded_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    cache::store_listing(&state.redis, &listing).await;

    Ok(Json(listing))
}

/// GET /api/v1/editais/:id
pub async fn handle_get_edital(
    State(state): State<AppState>,
    Path(edital_id): Path<Uuid>,
) -> Result<Json<EditalRow>, AppError> {
    let edital = load_edital(&state.db, edital_id).await?;
    Ok(Json(edital))
}

/// PUT /api/v1/editais/:id
///
/// Multipart: any of `name`, `edital_pdf`, `selected_pdf`. A replacement
/// edital PDF re-runs text and metadata extraction.
pub async fn handle_update_edital(
    State(state): State<AppState>,
    Path(edital_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<EditalRow>, AppError> {
    let mut edital = load_edital(&state.db, edital_id).await?;
    let form = read_upload_form(multipart).await?;

    if let Some(name) = form.name {
        if name.is_empty() {
            return Err(AppError::Validation(
                "O nome do edital não pode ficar vazio.".to_string(),
            ));
        }
        edital.name = name;
    }

    if let Some(bytes) = form.edital_pdf {
        let text = loaders::pdf::extract_pdf_text(&bytes)?;
        let key = storage::edital_pdf_key(edital_id);
        storage::put_pdf(&state.s3, &state.config.s3_bucket, &key, bytes.to_vec()).await?;

        let metadata = extract_edital_info(&state.llm, &text).await;
        edital.edital_text = text;
        edital.registration_date = metadata.data_inscricao;
        edital.categories = metadata.categorias;
        edital.required_texts = metadata.textos_requeridos;
        edital.required_documents = metadata.documentos_requeridos;
        edital.s3_pdf_key = Some(key);
    }

    if let Some(bytes) = form.selected_pdf {
        match loaders::pdf::extract_pdf_text(&bytes) {
            Ok(text) => {
                let key = storage::selected_pdf_key(edital_id);
                storage::put_pdf(&state.s3, &state.config.s3_bucket, &key, bytes.to_vec())
                    .await?;
                edital.selected_projects_text = Some(text);
                edital.s3_selected_pdf_key = Some(key);
            }
            Err(e) => {
                warn!("Selected-projects PDF unreadable, keeping previous text: {e}");
            }
        }
    }

    let updated = sqlx::query_as::<_, EditalRow>(
        r#"
        UPDATE editais
        SET name = $2, edital_text = $3, selected_projects_text = $4,
            registration_date = $5, categories = $6, required_texts = $7,
            required_documents = $8, s3_pdf_key = $9, s3_selected_pdf_key = $10,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(edital.id)
    .bind(&edital.name)
    .bind(&edital.edital_text)
    .bind(&edital.selected_projects_text)
    .bind(&edital.registration_date)
    .bind(&edital.categories)
    .bind(&edital.required_texts)
    .bind(&edital.required_documents)
    .bind(&edital.s3_pdf_key)
    .bind(&edital.s3_selected_pdf_key)
    .fetch_one(&state.db)
    .await?;

    cache::invalidate_listing(&state.redis).await;

    Ok(Json(updated))
}

/// DELETE /api/v1/editais/:id
///
/// Refused while any project still references the edital.
pub async fn handle_delete_edital(
    State(state): State<AppState>,
    Path(edital_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let edital = load_edital(&state.db, edital_id).await?;

    let (in_use,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE edital_id = $1)")
            .bind(edital_id)
            .fetch_one(&state.db)
            .await?;
    if in_use {
        return Err(AppError::Conflict(
            "Não é possível excluir este edital pois existem projetos associados a ele."
                .to_string(),
        ));
    }

    sqlx::query("DELETE FROM editais WHERE id = $1")
        .bind(edital_id)
        .execute(&state.db)
        .await?;

    // Best-effort cleanup of the stored PDFs; the row is already gone.
    for key in [edital.s3_pdf_key, edital.s3_selected_pdf_key].into_iter().flatten() {
        if let Err(e) = storage::delete_object(&state.s3, &state.config.s3_bucket, &key).await {
            warn!("Orphaned S3 object {key} after edital delete: {e}");
        }
    }

    cache::invalidate_listing(&state.redis).await;

    info!("Deleted edital {edital_id}");

    Ok(StatusCode::NO_CONTENT)
}
