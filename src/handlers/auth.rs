// src/handlers/auth.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::{AuthenticatedUser, TOKEN_COOKIE}, i18n::Locale},
    models::{
        auth::{
            LoginResponse, LoginUserPayload, Profile, RegisterResponse, RegisterUserPayload,
            UpdateProfilePayload, UpdateRolePayload, UpdatedUserResponse, UserListEntry,
            UserSummary,
        },
        common::MessageResponse,
    },
};

/// Cookie de sessão com o JWT. Vale 1 dia (o token em si vale 7).
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(1))
        .build()
}

// Mesmo nome e path do cookie de sessão, para o navegador apagá-lo
fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE).path("/").build()
}

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = RegisterResponse),
        (status = 400, description = "Dados inválidos ou e-mail já registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    payload
        .validate_document()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .auth_service
        .register_user(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuário criado com sucesso".into(),
            user,
        }),
    ))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado; também define o cookie `token`", body = LoginResponse),
        (status = 401, description = "Senha incorreta"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    Json(payload): Json<LoginUserPayload>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (user, token) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let jar = jar.add(session_cookie(token.clone(), app_state.config.production));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login realizado com sucesso".into(),
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Auth",
    responses((status = 200, description = "Cookie removido", body = MessageResponse)),
    security(("api_jwt" = []))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(expired_session_cookie()),
        Json(MessageResponse::new("Logout realizado com sucesso")),
    )
}

// Handler da rota protegida /profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado com seus pedidos", body = Profile),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .auth_service
        .get_profile(user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/users",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UpdatedUserResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let updated_user = app_state
        .auth_service
        .update_profile(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(UpdatedUserResponse {
        message: "Perfil atualizado com sucesso".into(),
        updated_user,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de usuários", body = Vec<UserListEntry>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<UserListEntry>>, ApiError> {
    let users = app_state
        .auth_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(users))
}

#[utoipa::path(
    put,
    path = "/api/users/role",
    tag = "Users",
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Papel atualizado", body = UpdatedUserResponse),
        (status = 400, description = "Role inválida"),
        (status = 403, description = "Admin padrão não pode ser rebaixado"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    let updated_user = app_state
        .auth_service
        .update_role(&payload.email, &payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(UpdatedUserResponse {
        message: format!("Usuário atualizado para {}", payload.role),
        updated_user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), false);
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(1)));
        assert_eq!(cookie.secure(), Some(false));

        assert_eq!(session_cookie("abc".into(), true).secure(), Some(true));
    }

    #[tokio::test]
    async fn test_logout_expires_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=abc"));

        let (jar, Json(body)) = logout(CookieJar::from_headers(&headers)).await;
        assert_eq!(body.message, "Logout realizado com sucesso");

        let response = (jar, "ok").into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
