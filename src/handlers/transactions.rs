// src/handlers/transactions.rs

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        common::MessageResponse,
        transaction::{DashboardFeed, Transaction, TransactionFilters, TransactionReport},
    },
};

// Relatório administrativo com resumo agregado
#[utoipa::path(
    get,
    path = "/api/transactions/admin",
    tag = "Transactions",
    params(TransactionFilters),
    responses(
        (status = 200, description = "Relatório de transações", body = TransactionReport),
        (status = 400, description = "Data inválida"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn report(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<TransactionFilters>, QueryRejection>,
) -> Result<Json<TransactionReport>, ApiError> {
    let Query(filters) = query.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let report = app_state
        .transaction_service
        .report(filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(report))
}

/// Feed consumido pelo dashboard externo (autenticado por `x-api-key`).
#[utoipa::path(
    get,
    path = "/api/transactions/dashboard",
    tag = "Transactions",
    responses(
        (status = 200, description = "Todas as transações", body = DashboardFeed),
        (status = 401, description = "Chave de API inválida")
    ),
    security(("api_key" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<DashboardFeed>, ApiError> {
    let feed = app_state
        .transaction_service
        .dashboard_feed()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(feed))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = i32, Path, description = "ID da transação")),
    responses(
        (status = 200, description = "Transação", body = Transaction),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn show(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = app_state
        .transaction_service
        .find(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = i32, Path, description = "ID da transação")),
    responses(
        (status = 200, description = "Transação removida", body = MessageResponse),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .transaction_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(MessageResponse::new("Transação removida com sucesso")))
}
