//! S3 persistence for uploaded edital PDFs. The extracted text lives in
//! Postgres; the original file is kept so users can re-download exactly
//! what they submitted.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Key for the main edital PDF of a given edital.
pub fn edital_pdf_key(edital_id: Uuid) -> String {
    format!("editais/{edital_id}/edital.pdf")
}

/// Key for the optional selected-projects PDF of a given edital.
pub fn selected_pdf_key(edital_id: Uuid) -> String {
    format!("editais/{edital_id}/selecionados.pdf")
}

pub async fn put_pdf(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    bytes: Vec<u8>,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!("Uploaded PDF to s3://{bucket}/{key}");
    Ok(())
}

pub async fn delete_object(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

    info!("Deleted s3://{bucket}/{key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_scoped_per_edital() {
        let id = Uuid::new_v4();
        assert_eq!(edital_pdf_key(id), format!("editais/{id}/edital.pdf"));
        assert_eq!(selected_pdf_key(id), format!("editais/{id}/selecionados.pdf"));
        assert_ne!(edital_pdf_key(id), selected_pdf_key(id));
    }
}
