//! Project diagnosis: two sequential LLM calls whose raw answers are
//! concatenated under fixed section headings, stored on the project and
//! returned as-is. No schema is imposed on the model output.

pub mod handlers;
pub mod prompts;
pub mod suggestions;

use crate::errors::AppError;
use crate::llm_client::prompts::CULTURAL_ADVISOR_SYSTEM;
use crate::llm_client::{truncate_chars, LlmClient};
use crate::models::edital::EditalRow;

/// Character budgets applied before the text lands in a prompt.
pub const PROJECT_PROMPT_BUDGET: usize = 10_000;
pub const EDITAL_PROMPT_BUDGET: usize = 15_000;
pub const SELECTED_PROMPT_BUDGET: usize = 20_000;

pub const EDITAL_SECTION_HEADING: &str = "### Análise contra o Edital";
pub const COMPARISON_SECTION_HEADING: &str = "### Comparativo com Projetos Selecionados";

/// Runs the full diagnosis. The comparison step is skipped when the edital
/// carries no selected-projects text; the evaluation section always comes
/// first.
pub async fn run_diagnosis(
    llm: &LlmClient,
    project_text: &str,
    edital: &EditalRow,
) -> Result<String, AppError> {
    let evaluation_prompt = prompts::EDITAL_EVALUATION_TEMPLATE
        .replace("{projeto}", truncate_chars(project_text, PROJECT_PROMPT_BUDGET))
        .replace(
            "{edital}",
            truncate_chars(&edital.edital_text, EDITAL_PROMPT_BUDGET),
        );
    let evaluation = llm
        .call_text(&evaluation_prompt, CULTURAL_ADVISOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let comparison = match edital
        .selected_projects_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        Some(selected) => {
            let comparison_prompt = prompts::SELECTED_COMPARISON_TEMPLATE
                .replace(
                    "{selecionados}",
                    truncate_chars(selected, SELECTED_PROMPT_BUDGET),
                )
                .replace("{projeto}", truncate_chars(project_text, PROJECT_PROMPT_BUDGET));
            Some(
                llm.call_text(&comparison_prompt, CULTURAL_ADVISOR_SYSTEM)
                    .await
                    .map_err(|e| AppError::Llm(e.to_string()))?,
            )
        }
        None => None,
    };

    Ok(compose_diagnosis(&evaluation, comparison.as_deref()))
}

fn compose_diagnosis(evaluation: &str, comparison: Option<&str>) -> String {
    let mut diagnosis = format!("{EDITAL_SECTION_HEADING}\n\n{evaluation}");
    if let Some(comparison) = comparison {
        diagnosis.push_str(&format!("\n\n{COMPARISON_SECTION_HEADING}\n\n{comparison}"));
    }
    diagnosis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_keep_evaluation_first() {
        let diagnosis = compose_diagnosis("avaliação", Some("comparativo"));
        let eval_pos = diagnosis.find(EDITAL_SECTION_HEADING).unwrap();
        let cmp_pos = diagnosis.find(COMPARISON_SECTION_HEADING).unwrap();
        assert!(eval_pos < cmp_pos);
        assert!(diagnosis.contains("avaliação"));
        assert!(diagnosis.contains("comparativo"));
    }

    #[test]
    fn test_comparison_section_is_omitted_without_selected_text() {
        let diagnosis = compose_diagnosis("avaliação", None);
        assert!(diagnosis.starts_with(EDITAL_SECTION_HEADING));
        assert!(!diagnosis.contains(COMPARISON_SECTION_HEADING));
    }

    #[test]
    fn test_templates_have_expected_placeholders() {
        assert!(prompts::EDITAL_EVALUATION_TEMPLATE.contains("{projeto}"));
        assert!(prompts::EDITAL_EVALUATION_TEMPLATE.contains("{edital}"));
        assert!(prompts::SELECTED_COMPARISON_TEMPLATE.contains("{selecionados}"));
        assert!(prompts::SELECTED_COMPARISON_TEMPLATE.contains("{projeto}"));
        assert!(prompts::SUGGESTIONS_TEMPLATE.contains("{projeto}"));
    }
}
