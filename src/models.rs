pub mod auth;
pub mod common;
pub mod indicator;
pub mod order;
pub mod product;
pub mod production;
pub mod status;
pub mod support;
pub mod transaction;
