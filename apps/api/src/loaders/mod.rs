//! Document loaders: turn uploaded files and URLs into plain text for the
//! LLM pipeline. Error messages are user-facing and stay in Portuguese.

pub mod csv;
pub mod pdf;
pub mod text;
pub mod web;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("O PDF está protegido por senha. Por favor, remova a proteção e tente novamente.")]
    PasswordProtected,

    #[error("O arquivo não parece ser um PDF válido.")]
    NotAPdf,

    #[error("O arquivo PDF parece estar corrompido.")]
    CorruptedPdf,

    #[error("Erro ao processar PDF: {0}")]
    PdfExtraction(String),

    #[error("Não foi possível extrair texto do PDF. O arquivo pode estar corrompido, protegido por senha ou conter apenas imagens.")]
    EmptyPdfText,

    #[error("Erro ao processar CSV: {0}")]
    Csv(String),

    #[error("Não foi possível carregar o site")]
    SiteUnavailable,

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedType(String),
}

/// Dispatches an uploaded file to the loader matching its extension.
pub fn extract_file_text(filename: &str, bytes: &[u8]) -> Result<String, LoaderError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => self::pdf::extract_pdf_text(bytes),
        "csv" => self::csv::extract_csv_text(bytes),
        "txt" => Ok(self::text::extract_txt_text(bytes)),
        other => Err(LoaderError::UnsupportedType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_extension_txt() {
        let out = extract_file_text("projeto.txt", "conteúdo do projeto".as_bytes()).unwrap();
        assert_eq!(out, "conteúdo do projeto");
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let out = extract_file_text("PROJETO.TXT", b"abc").unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_dispatch_rejects_unknown_extension() {
        let err = extract_file_text("planilha.xlsx", b"").unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedType(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn test_dispatch_rejects_missing_extension() {
        let err = extract_file_text("arquivo", b"").unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedType(_)));
    }
}
