//! LLM-backed metadata extraction for uploaded editais.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::editais::prompts::EDITAL_INFO_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// Structured fields the model is asked to pull out of an edital. Field
/// names mirror the JSON keys the prompt demands, and every field
/// defaults so a partial answer still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditalInfo {
    #[serde(default)]
    pub data_inscricao: String,
    #[serde(default)]
    pub categorias: Vec<String>,
    #[serde(default)]
    pub textos_requeridos: Vec<String>,
    #[serde(default)]
    pub documentos_requeridos: Vec<String>,
}

/// Runs the extraction call. A malformed or failed answer degrades to
/// empty metadata instead of failing the upload; the fields can be filled
/// in later by editing the edital.
pub async fn extract_edital_info(llm: &LlmClient, edital_text: &str) -> EditalInfo {
    let prompt = EDITAL_INFO_TEMPLATE.replace("{edital}", edital_text);

    match llm.call_json::<EditalInfo>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(info) => info,
        Err(e) => {
            warn!("Edital metadata extraction failed, storing empty fields: {e}");
            EditalInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_answer_parses() {
        let json = r#"{
            "data_inscricao": "15/03/2025",
            "categorias": ["Música", "Teatro"],
            "textos_requeridos": ["Objetivos", "Justificativa"],
            "documentos_requeridos": ["RG", "Comprovante de residência"]
        }"#;
        let info: EditalInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.data_inscricao, "15/03/2025");
        assert_eq!(info.categorias.len(), 2);
    }

    #[test]
    fn test_partial_answer_fills_defaults() {
        let info: EditalInfo = serde_json::from_str(r#"{"data_inscricao": "01/06/2025"}"#).unwrap();
        assert_eq!(info.data_inscricao, "01/06/2025");
        assert!(info.categorias.is_empty());
        assert!(info.textos_requeridos.is_empty());
        assert!(info.documentos_requeridos.is_empty());
    }

    #[test]
    fn test_template_embeds_edital_text() {
        let prompt = EDITAL_INFO_TEMPLATE.replace("{edital}", "EDITAL N 7");
        assert!(prompt.contains("Texto do edital:\nEDITAL N 7"));
        assert!(!prompt.contains("{edital}"));
    }
}
