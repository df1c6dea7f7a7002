pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
pub mod production_repo;
pub use production_repo::ProductionRepository;
pub mod support_repo;
pub use support_repo::SupportRepository;
pub mod indicator_repo;
pub use indicator_repo::IndicatorRepository;
