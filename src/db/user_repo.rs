// src/db/user_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{NewUser, Role, Segment, UpdateProfilePayload, User, UserListEntry},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

// Converte violações de chave única em erros mais amigáveis
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_cpf_key") | Some("users_cnpj_key") => AppError::DocumentAlreadyExists,
                _ => AppError::EmailAlreadyExists,
            };
        }
    }
    e.into()
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self) -> Result<Vec<UserListEntry>, AppError> {
        let users = sqlx::query_as::<_, UserListEntry>(
            r#"
            SELECT id, name, email, city, state, role, segment, total_spent
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Cria um novo usuário no banco de dados
    // Com tratamento de erro específico para e-mails e documentos duplicados.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: &NewUser) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                client_type, name, cpf, cnpj, email, password, phone,
                street, number, complement, district, city, state, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(new_user.client_type)
        .bind(&new_user.name)
        .bind(&new_user.cpf)
        .bind(&new_user.cnpj)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.phone)
        .bind(&new_user.street)
        .bind(&new_user.number)
        .bind(&new_user.complement)
        .bind(&new_user.district)
        .bind(&new_user.city)
        .bind(&new_user.state)
        .bind(new_user.role)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)
    }

    // Atualiza apenas os campos enviados
    pub async fn update_profile(
        &self,
        id: i32,
        changes: &UpdateProfilePayload,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name       = COALESCE($2, name),
                email      = COALESCE($3, email),
                phone      = COALESCE($4, phone),
                street     = COALESCE($5, street),
                number     = COALESCE($6, number),
                complement = COALESCE($7, complement),
                district   = COALESCE($8, district),
                city       = COALESCE($9, city),
                state      = COALESCE($10, state),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.street)
        .bind(&changes.number)
        .bind(&changes.complement)
        .bind(&changes.district)
        .bind(&changes.city)
        .bind(&changes.state)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn update_role_by_email(&self, email: &str, role: Role) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE email = $1 RETURNING *",
        )
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Incrementa o total gasto e devolve o usuário atualizado.
    pub async fn add_total_spent<'e, E>(
        &self,
        executor: E,
        id: i32,
        amount: Decimal,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET total_spent = total_spent + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::UserNotFound)
    }

    pub async fn set_segment<'e, E>(&self, executor: E, id: i32, segment: Segment) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET segment = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(segment)
            .execute(executor)
            .await?;
        Ok(())
    }
}
