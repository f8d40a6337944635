//! Mangalog - 漫画阅读记录服务
//!
//! 启动顺序：配置 → 日志 → 数据库 → 适配器 → 后台回收 → HTTP 服务

use std::sync::Arc;

use mangalog::config::{load_config, print_config, LogConfig};
use mangalog::domain::manga::UserId;
use mangalog::infrastructure::adapters::GoogleBooksClient;
use mangalog::infrastructure::events::EventPublisher;
use mangalog::infrastructure::http::{AppState, HttpServer, ServerConfig};
use mangalog::infrastructure::memory::{InMemoryAuthStore, InMemoryFormSessionManager};
use mangalog::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteMangaRepository,
};
use mangalog::infrastructure::worker::FormSweeper;

fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log.filter()));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    tracing::info!("Mangalog - manga reading log service");
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let manga_repo = Arc::new(SqliteMangaRepository::new(pool));
    let book_search = Arc::new(GoogleBooksClient::new(config.books.client_config())?);

    let auth = Arc::new(InMemoryAuthStore::new());
    for token in &config.auth.tokens {
        auth.issue(token.token.clone(), UserId::new(token.user_id.clone()), token.name.clone());
    }
    if auth.is_empty() {
        tracing::warn!("No auth tokens configured; every request is anonymous");
    }

    let form_sessions = Arc::new(InMemoryFormSessionManager::new());
    let event_publisher = Arc::new(EventPublisher::new());

    let sweeper = FormSweeper::new(
        config.form.sweeper(),
        form_sessions.clone(),
        event_publisher.clone(),
    );
    tokio::spawn(sweeper.run());

    let state = AppState::new(
        manga_repo,
        book_search,
        auth,
        form_sessions,
        event_publisher,
        config.form.options(),
    );
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
