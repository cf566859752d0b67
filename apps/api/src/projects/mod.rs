//! Project CRUD, draft text persistence and file/URL import.

pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::ProjectRow;

/// Loads a project enforcing ownership. Another user's project reads as
/// absent, not as forbidden.
pub async fn load_owned_project(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<ProjectRow, AppError> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1 AND user_id = $2")
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Projeto não encontrado.".to_string()))
}

/// Cleanup applied to imported text before the user reviews it: trims the
/// ends and collapses every run of line breaks (LF, CRLF or bare CR, mixed
/// freely) into one paragraph break.
/// Saving the reviewed text afterwards stores it exactly as submitted.
pub fn normalize_line_breaks(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            while matches!(chars.peek(), Some('\n' | '\r')) {
                chars.next();
            }
            out.push_str("\n\n");
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_breaks_become_paragraphs() {
        assert_eq!(normalize_line_breaks("linha um\nlinha dois"), "linha um\n\nlinha dois");
    }

    #[test]
    fn test_newline_runs_collapse_to_one_break() {
        assert_eq!(normalize_line_breaks("a\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_windows_breaks_are_normalized() {
        assert_eq!(
            normalize_line_breaks("linha um\r\nlinha dois"),
            "linha um\n\nlinha dois"
        );
        assert_eq!(normalize_line_breaks("a\r\n\r\n\r\nb\rc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_ends_are_trimmed() {
        assert_eq!(normalize_line_breaks("\n\n  texto  \n\n"), "texto");
    }

    #[test]
    fn test_text_without_breaks_is_untouched() {
        assert_eq!(normalize_line_breaks("parágrafo único"), "parágrafo único");
    }
}
