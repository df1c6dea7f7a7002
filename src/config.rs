// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{
        IndicatorRepository, OrderRepository, ProductRepository, ProductionRepository,
        SupportRepository, TransactionRepository, UserRepository,
    },
    services::{
        auth::AuthService, indicator_service::IndicatorService, order_service::OrderService,
        production_service::ProductionService, stock_service::StockService,
        support_service::SupportService, transaction_service::TransactionService,
    },
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configurações lidas do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub port: u16,
    pub client_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub api_dashboard_key: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("PORT inválida: {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {}", raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            port,
            client_url: env::var("CLIENT_URL").unwrap_or_else(|_| DEFAULT_CLIENT_URL.to_string()),
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            api_dashboard_key: non_empty_var("API_DASHBOARD_KEY"),
            production: env::var("APP_ENV").map(|v| v == "production").unwrap_or(false),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub order_service: OrderService,
    pub transaction_service: TransactionService,
    pub stock_service: StockService,
    pub production_service: ProductionService,
    pub support_service: SupportService,
    pub indicator_service: IndicatorService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let production_repo = ProductionRepository::new(db_pool.clone());
        let support_repo = SupportRepository::new(db_pool.clone());
        let indicator_repo = IndicatorRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            order_repo.clone(),
            config.jwt_secret.clone(),
            config.admin_email.clone(),
            db_pool.clone(),
        );
        let order_service = OrderService::new(
            order_repo,
            product_repo.clone(),
            user_repo,
            transaction_repo.clone(),
            db_pool.clone(),
        );
        let transaction_service = TransactionService::new(transaction_repo);
        let stock_service = StockService::new(product_repo.clone());
        let production_service = ProductionService::new(production_repo, product_repo.clone());
        let support_service = SupportService::new(support_repo, product_repo);
        let indicator_service = IndicatorService::new(indicator_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            order_service,
            transaction_service,
            stock_service,
            production_service,
            support_service,
            indicator_service,
        }
    }
}
