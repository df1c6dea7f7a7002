// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANG: &str = "pt";

// Nosso extrator de idioma
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn from_header(header_str: Option<&str>) -> Self {
        let lang = header_str
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    .map(|tag_string| {
                        // "pt-BR" -> "pt", "en" -> "en"
                        tag_string.split('-').next().unwrap_or(tag_string).to_lowercase()
                    })
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }

    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_str = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(header_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_portuguese() {
        assert_eq!(Locale::from_header(None).0, "pt");
        assert!(!Locale::default().is_english());
    }

    #[test]
    fn test_picks_preferred_language() {
        assert_eq!(Locale::from_header(Some("en-US,en;q=0.9,pt;q=0.8")).0, "en");
        assert_eq!(Locale::from_header(Some("pt-BR")).0, "pt");
        assert!(Locale::from_header(Some("en")).is_english());
    }
}
