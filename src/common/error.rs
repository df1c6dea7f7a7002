use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Documento já existe")]
    DocumentAlreadyExists,

    #[error("Não autorizado")]
    MissingToken,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Chave de API inválida")]
    InvalidApiKey,

    #[error("Senha incorreta")]
    WrongPassword,

    #[error("Acesso restrito a administradores")]
    AdminOnly,

    #[error("Chamado pertence a outro usuário")]
    NotTicketOwner,

    #[error("O admin padrão não pode perder o papel de admin")]
    ProtectedAdmin,

    #[error("Role inválida")]
    InvalidRole,

    #[error("Data inválida: {0}")]
    InvalidDate(String),

    #[error("Parâmetros de consulta inválidos: {0}")]
    InvalidQuery(String),

    #[error("Nada para atualizar")]
    EmptyOrderUpdate,

    #[error("Status de chamado inválido")]
    InvalidTicketStatus,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Transação não encontrada")]
    TransactionNotFound,

    #[error("Produção não encontrada")]
    ProductionNotFound,

    #[error("Chamado não encontrado")]
    TicketNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro já traduzido, pronto para virar resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::EmailAlreadyExists
            | AppError::DocumentAlreadyExists
            | AppError::InvalidRole
            | AppError::InvalidDate(_)
            | AppError::InvalidQuery(_)
            | AppError::EmptyOrderUpdate
            | AppError::InvalidTicketStatus => StatusCode::BAD_REQUEST,

            AppError::MissingToken
            | AppError::InvalidToken
            | AppError::InvalidApiKey
            | AppError::WrongPassword => StatusCode::UNAUTHORIZED,

            AppError::AdminOnly | AppError::NotTicketOwner | AppError::ProtectedAdmin => {
                StatusCode::FORBIDDEN
            }

            AppError::UserNotFound
            | AppError::ProductNotFound
            | AppError::OrderNotFound
            | AppError::TransactionNotFound
            | AppError::ProductionNotFound
            | AppError::TicketNotFound => StatusCode::NOT_FOUND,

            AppError::InsufficientStock => StatusCode::CONFLICT,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Mensagem para o cliente, no idioma pedido (pt por padrão)
    fn client_message(&self, en: bool) -> String {
        let (pt, en_msg) = match self {
            AppError::ValidationError(_) => ("Erro de validação", "Validation error"),
            AppError::EmailAlreadyExists => ("E-mail já registrado.", "E-mail already registered."),
            AppError::DocumentAlreadyExists => ("CPF/CNPJ já registrado.", "CPF/CNPJ already registered."),
            AppError::MissingToken => ("Não autorizado!", "Unauthorized!"),
            AppError::InvalidToken => ("Token inválido!", "Invalid token!"),
            AppError::InvalidApiKey => (
                "Acesso negado: chave de API inválida.",
                "Access denied: invalid API key.",
            ),
            AppError::WrongPassword => ("Senha incorreta", "Wrong password"),
            AppError::AdminOnly => (
                "Acesso negado: apenas administradores.",
                "Access denied: administrators only.",
            ),
            AppError::NotTicketOwner => (
                "Acesso negado: este chamado pertence a outro usuário.",
                "Access denied: this ticket belongs to another user.",
            ),
            AppError::ProtectedAdmin => (
                "Não é permitido alterar o papel do admin padrão",
                "The default admin's role cannot be changed",
            ),
            AppError::InvalidRole => ("Role inválida", "Invalid role"),
            AppError::InvalidDate(value) => {
                return if en {
                    format!("Invalid date: '{}'", value)
                } else {
                    format!("Data inválida: '{}'", value)
                };
            }
            AppError::InvalidQuery(_) => (
                "Parâmetros de consulta inválidos.",
                "Invalid query parameters.",
            ),
            AppError::EmptyOrderUpdate => (
                "Informe status ou statusDetail para atualizar",
                "Provide status or statusDetail to update",
            ),
            AppError::InvalidTicketStatus => (
                "Status de chamado deve ser open, in_progress ou closed.",
                "Ticket status must be open, in_progress or closed.",
            ),
            AppError::InsufficientStock => (
                "Estoque insuficiente para este pedido.",
                "Not enough stock for this order.",
            ),
            AppError::UserNotFound => ("Usuário não encontrado", "User not found"),
            AppError::ProductNotFound => ("Produto não encontrado", "Product not found"),
            AppError::OrderNotFound => ("Pedido não encontrado", "Order not found"),
            AppError::TransactionNotFound => ("Transação não encontrada.", "Transaction not found."),
            AppError::ProductionNotFound => ("Produção não encontrada", "Production not found"),
            AppError::TicketNotFound => ("Chamado não encontrado", "Ticket not found"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ("Ocorreu um erro inesperado.", "An unexpected error occurred."),
        };

        if en { en_msg.to_string() } else { pt.to_string() }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            AppError::InvalidQuery(reason) => Some(json!({ "query": reason })),
            _ => None,
        };

        ApiError {
            status,
            error: self.client_message(locale.is_english()),
            details,
        }
    }
}

// Retorna todos os detalhes da validação, campo a campo.
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), json!(messages));
    }
    Value::Object(details)
}

// Query string que não desserializa (ex.: `userId=abc`)
impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AdminOnly.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TicketNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InsufficientStock.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_follow_locale() {
        let pt = AppError::ProductNotFound.to_api_error(&Locale("pt".into()));
        let en = AppError::ProductNotFound.to_api_error(&Locale("en".into()));
        assert_eq!(pt.error, "Produto não encontrado");
        assert_eq!(en.error, "Product not found");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"))
            .to_api_error(&Locale::default());
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn test_invalid_query_is_a_localized_bad_request() {
        let err = AppError::InvalidQuery("userId: invalid digit".into());
        let pt = err.to_api_error(&Locale::default());
        assert_eq!(pt.status, StatusCode::BAD_REQUEST);
        assert_eq!(pt.error, "Parâmetros de consulta inválidos.");
        assert_eq!(pt.details.unwrap()["query"], "userId: invalid digit");

        let en = err.to_api_error(&Locale("en".into()));
        assert_eq!(en.error, "Invalid query parameters.");
    }

    #[test]
    fn test_validation_details_per_field() {
        let mut err = ValidationError::new("length");
        err.message = Some("Nome obrigatório".into());
        let mut errors = ValidationErrors::new();
        errors.add("name", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "Nome obrigatório");
    }
}
