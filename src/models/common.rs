// src/models/common.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resposta simples com apenas uma mensagem
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
