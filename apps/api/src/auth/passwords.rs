use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::errors::AppError;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Checks the password rules applied at signup and at reset confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(
            "A senha deve ter pelo menos 6 caracteres.".to_string(),
        ));
    }
    if password != confirm {
        return Err(AppError::Validation("As senhas não coincidem.".to_string()));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_is_rejected() {
        let err = validate_new_password("12345", "12345").unwrap_err();
        assert!(err.to_string().contains("pelo menos 6 caracteres"));
    }

    #[test]
    fn test_six_multibyte_chars_pass_the_length_rule() {
        assert!(validate_new_password("çãéíõú", "çãéíõú").is_ok());
    }

    #[test]
    fn test_mismatched_confirmation_is_rejected() {
        let err = validate_new_password("segredo", "segred0").unwrap_err();
        assert!(err.to_string().contains("não coincidem"));
    }

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("minha-senha-forte").unwrap();
        assert!(verify_password("minha-senha-forte", &hash));
        assert!(!verify_password("outra-senha", &hash));
    }

    #[test]
    fn test_verify_tolerates_garbage_hashes() {
        assert!(!verify_password("qualquer", "not-a-phc-string"));
    }
}
