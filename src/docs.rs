// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::middleware::api_key::API_KEY_HEADER;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::auth::list_users,
        handlers::auth::update_role,

        // --- Orders ---
        handlers::orders::place_order,
        handlers::orders::list_user_orders,
        handlers::orders::list_orders,
        handlers::orders::update_order_status,

        // --- Stock ---
        handlers::stock::list_products,
        handlers::stock::create_product,
        handlers::stock::update_product,

        // --- Transactions ---
        handlers::transactions::report,
        handlers::transactions::dashboard,
        handlers::transactions::show,
        handlers::transactions::delete,

        // --- Production ---
        handlers::production::list,
        handlers::production::create,
        handlers::production::update,

        // --- Support ---
        handlers::support::list_user_tickets,
        handlers::support::list_all_tickets,
        handlers::support::open_ticket,
        handlers::support::update_ticket,
        handlers::support::send_message,
        handlers::support::list_messages,

        // --- Indicators ---
        handlers::indicators::get_indicators,
    ),
    components(
        schemas(
            models::status::Status,
            models::common::MessageResponse,

            // --- Auth ---
            models::auth::ClientType,
            models::auth::Role,
            models::auth::Segment,
            models::auth::User,
            models::auth::UserListEntry,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::UpdateRolePayload,
            models::auth::LoginResponse,
            models::auth::RegisterResponse,
            models::auth::UpdatedUserResponse,
            models::auth::Profile,

            // --- Orders ---
            models::order::Order,
            models::order::OrderCustomer,
            models::order::OrderWithRelations,
            models::order::OrderWithProduct,
            models::order::PlacedOrder,
            models::order::OrderCreatedResponse,
            models::order::OrderUpdatedResponse,

            // --- Stock ---
            models::product::Product,

            // --- Transactions ---
            models::transaction::Transaction,
            models::transaction::TransactionFilters,
            models::transaction::ReportCustomer,
            models::transaction::ReportProduct,
            models::transaction::ReportEntry,
            models::transaction::ReportSummary,
            models::transaction::TransactionReport,
            models::transaction::DashboardCustomer,
            models::transaction::DashboardProduct,
            models::transaction::DashboardEntry,
            models::transaction::DashboardFeed,

            // --- Production ---
            models::production::Production,
            models::production::ProductionWithProduct,

            // --- Support ---
            models::support::MessageSender,
            models::support::SupportTicket,
            models::support::TicketMessage,
            models::support::TicketWithProduct,
            models::support::TicketProduct,
            models::support::AdminTicketView,
            models::support::MessageCreatedResponse,

            models::indicator::Indicators,

            // --- Payloads ---
            handlers::orders::PlaceOrderPayload,
            handlers::orders::UpdateOrderStatusPayload,
            handlers::stock::CreateProductPayload,
            handlers::stock::UpdateProductPayload,
            handlers::production::CreateProductionPayload,
            handlers::production::UpdateProductionPayload,
            handlers::support::CreateTicketPayload,
            handlers::support::UpdateTicketPayload,
            handlers::support::CreateMessagePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Perfil e Gestão de Usuários"),
        (name = "Orders", description = "Pedidos de Clientes"),
        (name = "Stock", description = "Catálogo e Estoque de Produtos"),
        (name = "Transactions", description = "Relatórios de Vendas e Feed do Dashboard"),
        (name = "Production", description = "Ordens de Produção"),
        (name = "Support", description = "Chamados de Suporte e Mensagens"),
        (name = "Indicators", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}
