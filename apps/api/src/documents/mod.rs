//! Accessory document generation. Eight generators share one shape: fill
//! the kind's template with the (truncated) project text, prepend the
//! stored diagnosis as context when there is one, make a single LLM call
//! and hand back the raw text for review. Nothing is saved until the user
//! explicitly stores the reviewed version.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::diagnosis::PROJECT_PROMPT_BUDGET;
use crate::errors::AppError;
use crate::llm_client::prompts::{CULTURAL_ADVISOR_SYSTEM, DIAGNOSIS_CONTEXT_TEMPLATE};
use crate::llm_client::{truncate_chars, LlmClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ResumoExecutivo,
    OrcamentoCompleto,
    CronogramaDetalhado,
    ObjetivosSmart,
    JustificativaTecnica,
    EtapasDeTrabalho,
    FichaTecnica,
    PlanoDeDivulgacao,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        DocumentKind::ResumoExecutivo,
        DocumentKind::OrcamentoCompleto,
        DocumentKind::CronogramaDetalhado,
        DocumentKind::ObjetivosSmart,
        DocumentKind::JustificativaTecnica,
        DocumentKind::EtapasDeTrabalho,
        DocumentKind::FichaTecnica,
        DocumentKind::PlanoDeDivulgacao,
    ];

    /// Stable identifier used in routes and as the documents-map key.
    pub fn slug(self) -> &'static str {
        match self {
            DocumentKind::ResumoExecutivo => "resumo_executivo",
            DocumentKind::OrcamentoCompleto => "orcamento_completo",
            DocumentKind::CronogramaDetalhado => "cronograma_detalhado",
            DocumentKind::ObjetivosSmart => "objetivos_smart",
            DocumentKind::JustificativaTecnica => "justificativa_tecnica",
            DocumentKind::EtapasDeTrabalho => "etapas_de_trabalho",
            DocumentKind::FichaTecnica => "ficha_tecnica",
            DocumentKind::PlanoDeDivulgacao => "plano_de_divulgacao",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DocumentKind::ResumoExecutivo => "Resumo Executivo",
            DocumentKind::OrcamentoCompleto => "Orçamento Completo",
            DocumentKind::CronogramaDetalhado => "Cronograma Detalhado",
            DocumentKind::ObjetivosSmart => "Objetivos SMART",
            DocumentKind::JustificativaTecnica => "Justificativa Técnica",
            DocumentKind::EtapasDeTrabalho => "Etapas de Trabalho",
            DocumentKind::FichaTecnica => "Ficha Técnica",
            DocumentKind::PlanoDeDivulgacao => "Plano de Divulgação",
        }
    }

    pub fn from_slug(slug: &str) -> Option<DocumentKind> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    fn template(self) -> &'static str {
        match self {
            DocumentKind::ResumoExecutivo => prompts::RESUMO_EXECUTIVO_TEMPLATE,
            DocumentKind::OrcamentoCompleto => prompts::ORCAMENTO_COMPLETO_TEMPLATE,
            DocumentKind::CronogramaDetalhado => prompts::CRONOGRAMA_DETALHADO_TEMPLATE,
            DocumentKind::ObjetivosSmart => prompts::OBJETIVOS_SMART_TEMPLATE,
            DocumentKind::JustificativaTecnica => prompts::JUSTIFICATIVA_TECNICA_TEMPLATE,
            DocumentKind::EtapasDeTrabalho => prompts::ETAPAS_DE_TRABALHO_TEMPLATE,
            DocumentKind::FichaTecnica => prompts::FICHA_TECNICA_TEMPLATE,
            DocumentKind::PlanoDeDivulgacao => prompts::PLANO_DE_DIVULGACAO_TEMPLATE,
        }
    }
}

/// Builds the final prompt: optional diagnosis context block, then the
/// kind's template filled with the truncated project text.
fn compose_document_prompt(
    kind: DocumentKind,
    project_text: &str,
    diagnosis: Option<&str>,
) -> String {
    let context = match diagnosis {
        Some(d) if !d.trim().is_empty() => DIAGNOSIS_CONTEXT_TEMPLATE.replace("{diagnostico}", d),
        _ => String::new(),
    };
    let body = kind
        .template()
        .replace("{texto}", truncate_chars(project_text, PROJECT_PROMPT_BUDGET));
    format!("{context}{body}")
}

pub async fn generate_document(
    llm: &LlmClient,
    kind: DocumentKind,
    project_text: &str,
    diagnosis: Option<&str>,
) -> Result<String, AppError> {
    let prompt = compose_document_prompt(kind, project_text, diagnosis);
    llm.call_text(&prompt, CULTURAL_ADVISOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))
}
