mod api;
mod config;
mod seed;
mod storage;

use crate::api::AppState;
use crate::config::{AppConfig, StorageBackend};
use crate::storage::{MemorySalesStore, MongoSalesStore, SalesStore};
use anyhow::Context;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("🚀 Starting Avocado Sales API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Storage: {}", config.storage.backend);
    info!("   - Reset on start: {}", config.seed.reset_on_start);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Connect storage; a failed initial connection ends the process
    info!("💾 Connecting to storage...");
    let store: Arc<dyn SalesStore> = match config.storage.backend {
        StorageBackend::Mongodb => Arc::new(
            MongoSalesStore::connect(
                &config.storage.uri,
                &config.storage.database,
                &config.storage.collection,
            )
            .await?,
        ),
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data is lost on exit");
            Arc::new(MemorySalesStore::new())
        }
    };
    info!("✅ Storage ready");

    // Reseed before the listener exists so no request sees a partial collection
    if config.seed.reset_on_start {
        info!("🌱 Reseeding from {:?}", config.seed.dataset_path);
        let sales = seed::load_dataset(&config.seed.dataset_path)?;
        seed::seed(store.as_ref(), &sales).await?;
    }

    let total_sales = store.count().await.context("Failed to count sales")?;
    info!("✅ Collection holds {} sales", total_sales);

    let state = AppState { store };

    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                              - API info");
    info!("   GET  /health                        - Health check");
    info!("   GET  /avocado-sales                 - List sales (region, date, min, max)");
    info!("   GET  /avocado-sales/{{id}}            - Sale by id");
    info!("   GET  /avocado-sales/region/{{region}} - Sales by region");
    info!("   GET  /avocado-sales/date/{{date}}     - Sales by date");
    info!("   GET  /avocado-sales/price-range     - Sales by price (min, max)");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
