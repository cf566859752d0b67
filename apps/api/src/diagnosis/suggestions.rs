//! Parsing and application of suggestion blocks.
//!
//! The model is instructed to emit numbered blocks:
//!
//! ```text
//! [SUGESTÃO 1]
//! Trecho Original: ...
//! Proposta de Mudança: ...
//! Novo Texto: ...
//! ```
//!
//! Parsing is strict line-prefix matching: a record is produced only when
//! all three labeled lines appear, in order, between a marker and the next
//! one. Anything else is silently dropped, so a sloppy answer undercounts
//! rather than fails.

use crate::errors::AppError;
use crate::models::project::Suggestion;

const MARKER_PREFIX: &str = "[SUGESTÃO ";
const ORIGINAL_PREFIX: &str = "Trecho Original:";
const CHANGE_PREFIX: &str = "Proposta de Mudança:";
const NEW_TEXT_PREFIX: &str = "Novo Texto:";

pub fn parse_suggestions(response: &str) -> Vec<Suggestion> {
    let lines: Vec<&str> = response.lines().map(str::trim).collect();
    let mut suggestions = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let Some(number) = parse_marker(lines[i]) else {
            i += 1;
            continue;
        };

        let mut original = None;
        let mut change = None;
        let mut new_text = None;

        let mut j = i + 1;
        while j < lines.len() && parse_marker(lines[j]).is_none() {
            let line = lines[j];
            if original.is_none() {
                if let Some(rest) = line.strip_prefix(ORIGINAL_PREFIX) {
                    original = Some(rest.trim().to_string());
                }
            } else if change.is_none() {
                if let Some(rest) = line.strip_prefix(CHANGE_PREFIX) {
                    change = Some(rest.trim().to_string());
                }
            } else if new_text.is_none() {
                if let Some(rest) = line.strip_prefix(NEW_TEXT_PREFIX) {
                    new_text = Some(rest.trim().to_string());
                }
            }
            j += 1;
        }

        if let (Some(original_excerpt), Some(change_summary), Some(new_text)) =
            (original, change, new_text)
        {
            suggestions.push(Suggestion {
                number,
                original_excerpt,
                change_summary,
                new_text,
                applied: false,
            });
        }

        i = j;
    }

    suggestions
}

fn parse_marker(line: &str) -> Option<u32> {
    line.strip_prefix(MARKER_PREFIX)?
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()
}

/// Replaces the first occurrence of the suggestion's original excerpt with
/// its new text. Literal substring match, no fuzzy recovery.
pub fn apply_suggestion(project_text: &str, suggestion: &Suggestion) -> Result<String, AppError> {
    if suggestion.original_excerpt.is_empty()
        || !project_text.contains(&suggestion.original_excerpt)
    {
        return Err(AppError::UnprocessableEntity(
            "Trecho original não encontrado no texto do projeto.".to_string(),
        ));
    }
    Ok(project_text.replacen(&suggestion.original_excerpt, &suggestion.new_text, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
[SUGESTÃO 1]
Trecho Original: O projeto visa cultura.
Proposta de Mudança: Especificar o público-alvo.
Novo Texto: O projeto leva oficinas de música a 200 jovens da zona leste.

[SUGESTÃO 2]
Trecho Original: Faremos eventos.
Proposta de Mudança: Quantificar as entregas.
Novo Texto: Realizaremos 8 apresentações públicas gratuitas.";

    #[test]
    fn test_record_count_matches_marker_count() {
        let suggestions = parse_suggestions(WELL_FORMED);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].number, 1);
        assert_eq!(suggestions[1].number, 2);
        assert_eq!(suggestions[0].original_excerpt, "O projeto visa cultura.");
        assert_eq!(suggestions[1].change_summary, "Quantificar as entregas.");
        assert!(!suggestions[0].applied);
    }

    #[test]
    fn test_missing_line_drops_only_that_record() {
        let response = "\
[SUGESTÃO 1]
Trecho Original: A
Novo Texto: B

[SUGESTÃO 2]
Trecho Original: C
Proposta de Mudança: D
Novo Texto: E";
        let suggestions = parse_suggestions(response);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].number, 2);
    }

    #[test]
    fn test_reordered_fields_drop_the_record() {
        let response = "\
[SUGESTÃO 1]
Proposta de Mudança: D
Trecho Original: C
Novo Texto: E";
        assert!(parse_suggestions(response).is_empty());
    }

    #[test]
    fn test_prose_around_blocks_is_ignored() {
        let response =
            format!("Claro! Seguem as sugestões:\n\n{WELL_FORMED}\n\nEspero ter ajudado!");
        assert_eq!(parse_suggestions(&response).len(), 2);
    }

    #[test]
    fn test_unnumbered_marker_is_not_a_block() {
        let response = "[SUGESTÃO X]\nTrecho Original: a\nProposta de Mudança: b\nNovo Texto: c";
        assert!(parse_suggestions(response).is_empty());
    }

    #[test]
    fn test_apply_replaces_first_occurrence_only() {
        let suggestion = Suggestion {
            number: 1,
            original_excerpt: "cultura".to_string(),
            change_summary: String::new(),
            new_text: "cultura popular".to_string(),
            applied: false,
        };
        let result = apply_suggestion("fomento à cultura; cultura viva", &suggestion).unwrap();
        assert_eq!(result, "fomento à cultura popular; cultura viva");
    }

    #[test]
    fn test_apply_fails_when_excerpt_is_absent() {
        let suggestion = Suggestion {
            number: 1,
            original_excerpt: "não existe".to_string(),
            change_summary: String::new(),
            new_text: "x".to_string(),
            applied: false,
        };
        let err = apply_suggestion("texto do projeto", &suggestion).unwrap_err();
        assert!(err.to_string().contains("Trecho original não encontrado"));
    }

    #[test]
    fn test_apply_rejects_empty_excerpt() {
        let suggestion = Suggestion {
            number: 1,
            original_excerpt: String::new(),
            change_summary: String::new(),
            new_text: "x".to_string(),
            applied: false,
        };
        assert!(apply_suggestion("texto", &suggestion).is_err());
    }
}
