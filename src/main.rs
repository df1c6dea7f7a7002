//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let port = config.port;
    let admin_password = config.admin_password.clone();

    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante o admin padrão (ADMIN_EMAIL / ADMIN_PASSWORD)
    app_state
        .auth_service
        .ensure_default_admin(admin_password.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao criar o admin padrão: {}", e))?;

    let app = routes::build_router(app_state);

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://localhost:{}/swagger-ui", port);

    axum::serve(listener, app)
        .await
        .context("Erro no servidor Axum")?;

    Ok(())
}
