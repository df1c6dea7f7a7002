// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

pub const TOKEN_COOKIE: &str = "token";

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Token do header `Authorization: Bearer` ou, na falta dele, do cookie `token`.
pub fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

// O middleware de autenticação
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers(), &jar)
        .ok_or_else(|| AppError::MissingToken.to_api_error(&locale))?;

    let user = app_state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

// Deve rodar depois do `auth_guard`
pub async fn admin_guard(
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let is_admin = match request.extensions().get::<AuthenticatedUser>() {
        Some(AuthenticatedUser(user)) => user.is_admin(),
        None => return Err(AppError::MissingToken.to_api_error(&locale)),
    };

    if !is_admin {
        return Err(AppError::AdminOnly.to_api_error(&locale));
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::MissingToken.to_api_error(&Locale::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from-cookie"));
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(extract_token(&headers, &jar).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_cookie_token_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=xyz"));
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(extract_token(&headers, &jar).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_or_malformed_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        let jar = CookieJar::from_headers(&headers);

        assert!(extract_token(&headers, &jar).is_none());
        assert!(extract_token(&HeaderMap::new(), &CookieJar::new()).is_none());
    }
}
