// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{OrderRepository, UserRepository},
    models::auth::{
        ClientType, Claims, NewUser, Profile, RegisterUserPayload, Role, UpdateProfilePayload,
        User, UserListEntry,
    },
};

// Custo do hash das senhas
const BCRYPT_COST: u32 = 10;
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    order_repo: OrderRepository,
    jwt_secret: String,
    // E-mail do admin padrão (não pode ser rebaixado)
    admin_email: Option<String>,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        order_repo: OrderRepository,
        jwt_secret: String,
        admin_email: Option<String>,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, order_repo, jwt_secret, admin_email, pool }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<User, AppError> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = hash_password(&payload.password).await?;
        let new_user = payload.into_new_user(hashed_password);

        let user = self.user_repo.create_user(&self.pool, &new_user).await?;
        tracing::info!("👤 Novo usuário registrado: id={}", user.id);
        Ok(user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !verify_password(password, &user.password).await? {
            return Err(AppError::WrongPassword);
        }

        let token = self.create_token(&user)?;
        Ok((user, token))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        issue_token(&self.jwt_secret, user.id, user.role)
    }

    pub async fn get_profile(&self, user: User) -> Result<Profile, AppError> {
        let orders = self.order_repo.list_by_user(user.id).await?;
        Ok(Profile { user, orders })
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        changes: &UpdateProfilePayload,
    ) -> Result<User, AppError> {
        self.user_repo
            .update_profile(user_id, changes)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<UserListEntry>, AppError> {
        self.user_repo.list().await
    }

    pub async fn update_role(&self, email: &str, role: &str) -> Result<User, AppError> {
        let role = Role::parse(role).ok_or(AppError::InvalidRole)?;

        if role != Role::Admin && self.admin_email.as_deref() == Some(email) {
            return Err(AppError::ProtectedAdmin);
        }

        let user = self.user_repo
            .update_role_by_email(email, role)
            .await?
            .ok_or(AppError::UserNotFound)?;

        tracing::info!("🔑 Papel do usuário {} alterado para {:?}", user.id, role);
        Ok(user)
    }

    /// Cria o admin padrão na primeira inicialização.
    pub async fn ensure_default_admin(&self, password: Option<&str>) -> Result<(), AppError> {
        let (Some(email), Some(password)) = (self.admin_email.as_deref(), password) else {
            tracing::warn!("⚠️ ADMIN_EMAIL/ADMIN_PASSWORD não definidos; admin padrão não será criado.");
            return Ok(());
        };

        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::info!("Usuário admin padrão já existe.");
            return Ok(());
        }

        let new_admin = NewUser {
            client_type: ClientType::Company,
            name: "Administrador".into(),
            cpf: None,
            cnpj: Some("00000000000000".into()),
            email: email.to_string(),
            password_hash: hash_password(password).await?,
            phone: "00000000000".into(),
            street: "-".into(),
            number: "-".into(),
            complement: "-".into(),
            district: "-".into(),
            city: "Rio Claro".into(),
            state: "SP".into(),
            role: Role::Admin,
        };

        self.user_repo.create_user(&self.pool, &new_admin).await?;
        tracing::info!("✅ Admin padrão criado: {}", email);
        Ok(())
    }
}

// ---
// Senhas (bcrypt roda num thread separado)
// ---

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, BCRYPT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

// ---
// JWT
// ---

pub fn issue_token(secret: &str, user_id: i32, role: Role) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    #[test]
    fn test_issue_and_decode_token() {
        let token = issue_token(SECRET, 42, Role::Admin).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_DAYS * 24 * 60 * 60) as usize);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = issue_token("another-secret-entirely", 1, Role::User).unwrap();
        let err = decode_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let past = (Utc::now() - chrono::Duration::days(1)).timestamp() as usize;
        let claims = Claims { sub: 1, role: Role::User, exp: past, iat: past - 10 };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(decode_token(SECRET, "not-a-jwt"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let hashed = hash_password("segredo123").await.unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(verify_password("segredo123", &hashed).await.unwrap());
        assert!(!verify_password("errada", &hashed).await.unwrap());
    }
}
