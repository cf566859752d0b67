//! PDF text extraction. Page breaks become blank lines so downstream
//! prompts keep a notion of document structure; newlines inside a page
//! are flattened since extractors break lines at visual boundaries.

use super::LoaderError;

/// Extraction shorter than this is treated as "no usable text" (scanned
/// or image-only PDFs typically yield a handful of stray characters).
const MIN_EXTRACTED_CHARS: usize = 10;

pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, LoaderError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| classify_pdf_failure(&e.to_string()))?;

    let text = pages
        .iter()
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.chars().count() <= MIN_EXTRACTED_CHARS {
        return Err(LoaderError::EmptyPdfText);
    }
    Ok(text)
}

/// Maps extractor error strings onto user-facing categories. The extractor
/// surfaces lopdf errors verbatim, so matching is on well-known fragments.
fn classify_pdf_failure(message: &str) -> LoaderError {
    let lower = message.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") || lower.contains("decrypt") {
        LoaderError::PasswordProtected
    } else if lower.contains("header") || lower.contains("not a pdf") {
        LoaderError::NotAPdf
    } else if lower.contains("trailer") || lower.contains("xref") || lower.contains("corrupt") {
        LoaderError::CorruptedPdf
    } else {
        LoaderError::PdfExtraction(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }

    #[test]
    fn test_extracts_text_from_valid_pdf() {
        let pdf = make_test_pdf("Edital de fomento cultural numero 12 de 2025");
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(text.contains("Edital de fomento cultural"));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = extract_pdf_text(b"isto nao e um pdf").unwrap_err();
        assert!(err.to_string().contains("PDF"));
    }

    #[test]
    fn test_rejects_pdf_without_usable_text() {
        let pdf = make_test_pdf("");
        let err = extract_pdf_text(&pdf).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyPdfText));
        assert!(err.to_string().contains("apenas imagens"));
    }

    #[test]
    fn test_classifies_password_failures() {
        let err = classify_pdf_failure("the PDF is encrypted and no password was supplied");
        assert!(matches!(err, LoaderError::PasswordProtected));
        assert!(err.to_string().contains("protegido por senha"));
    }

    #[test]
    fn test_classifies_header_failures() {
        let err = classify_pdf_failure("Invalid file header");
        assert!(matches!(err, LoaderError::NotAPdf));
    }

    #[test]
    fn test_classifies_structure_failures() {
        let err = classify_pdf_failure("Invalid xref entry at offset 991");
        assert!(matches!(err, LoaderError::CorruptedPdf));
        assert!(err.to_string().contains("corrompido"));
    }

    #[test]
    fn test_unknown_failures_keep_original_message() {
        let err = classify_pdf_failure("stream filter not implemented");
        assert!(matches!(err, LoaderError::PdfExtraction(_)));
        assert!(err.to_string().contains("stream filter not implemented"));
    }
}
