pub mod date_filter;
pub mod error;
pub mod validation;
