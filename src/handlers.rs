pub mod auth;
pub mod indicators;
pub mod orders;
pub mod production;
pub mod stock;
pub mod support;
pub mod transactions;
