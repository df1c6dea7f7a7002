pub mod auth;
pub mod indicator_service;
pub mod order_service;
pub mod production_service;
pub mod stock_service;
pub mod support_service;
pub mod transaction_service;
