// src/models/status.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status compartilhado por pedidos, transações, produção e chamados.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,    // Vira "pending"
    InProgress, // Vira "in_progress"
    Open,
    Closed,
    Completed,
    Cancelled,
}

impl Status {
    /// Status que um chamado de suporte pode assumir.
    pub fn is_ticket_status(self) -> bool {
        matches!(self, Status::Open | Status::InProgress | Status::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_snake_case_literals() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in_progress\"");
        let parsed: Status = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, Status::Cancelled);
    }

    #[test]
    fn test_ticket_statuses() {
        assert!(Status::Open.is_ticket_status());
        assert!(Status::InProgress.is_ticket_status());
        assert!(Status::Closed.is_ticket_status());
        assert!(!Status::Pending.is_ticket_status());
        assert!(!Status::Completed.is_ticket_status());
    }
}
