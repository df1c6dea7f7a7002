use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

// Algo@algo.algo, sem espaços
pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("regex de e-mail inválida"));

// ---
// Validações customizadas reaproveitadas pelos payloads
// ---

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("O campo não pode estar vazio.".into());
        return Err(err);
    }
    Ok(())
}

/// `true` quando `value` tem exatamente `len` dígitos ASCII.
pub fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_RE.is_match("a@b.co"));
        assert!(EMAIL_RE.is_match("maria.silva@empresa.com.br"));
        assert!(!EMAIL_RE.is_match("a@localhost"));
        assert!(!EMAIL_RE.is_match("sem-arroba.com"));
        assert!(!EMAIL_RE.is_match("com espaco@b.co"));
    }

    #[test]
    fn test_not_negative() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(1999, 2)).is_ok());
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("ok").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("12345678901", 11));
        assert!(!is_digits("1234567890", 11));
        assert!(!is_digits("1234567890x", 11));
        assert!(is_digits("12345678000199", 14));
    }
}
