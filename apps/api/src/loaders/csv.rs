//! CSV extraction. Each row becomes a block of `header: value` lines so
//! tabular context (selected-project lists, score tables) survives as
//! prose the model can read. Blocks are separated by blank lines.

use super::LoaderError;

pub fn extract_csv_text(bytes: &[u8]) -> Result<String, LoaderError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| LoaderError::Csv(e.to_string()))?
        .clone();

    let mut blocks = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoaderError::Csv(e.to_string()))?;
        let lines: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{}: {}", headers.get(i).unwrap_or(""), field.trim()))
            .collect();
        blocks.push(lines.join("\n"));
    }

    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_become_labelled_blocks() {
        let csv =
            "projeto,proponente,nota\nFestival de Inverno,Maria,9.5\nSarau Popular,Jo\u{e3}o,8.0\n";
        let text = extract_csv_text(csv.as_bytes()).unwrap();
        assert_eq!(
            text,
            "projeto: Festival de Inverno\nproponente: Maria\nnota: 9.5\n\nprojeto: Sarau Popular\nproponente: Jo\u{e3}o\nnota: 8.0"
        );
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv = "projeto,resumo\nMostra,\"Dan\u{e7}a, teatro e circo\"\n";
        let text = extract_csv_text(csv.as_bytes()).unwrap();
        assert!(text.contains("resumo: Dan\u{e7}a, teatro e circo"));
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "a,b,c\n1,2\n";
        let text = extract_csv_text(csv.as_bytes()).unwrap();
        assert_eq!(text, "a: 1\nb: 2");
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let bytes = [b'a', b',', b'b', b'\n', 0xFF, 0xFE, b',', b'x', b'\n'];
        let err = extract_csv_text(&bytes).unwrap_err();
        assert!(matches!(err, LoaderError::Csv(_)));
    }
}
