//! Server startup and shutdown logic

use anyhow::{Context, Result};
use axum::{middleware::from_fn, Router};
use gymdesk_config::GymdeskConfig;
use gymdesk_interfaces::RepositoryFactory;
use gymdesk_rest_api::{create_rest_app, AppConfig, AppContext};
use gymdesk_storage::{DatabaseConnection, SeaOrmRepositoryFactory};
use gymdesk_web::{cors_layer, envelope_error_responses, request_id_middleware, JwtManager};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Server application struct
pub struct Server {
    config: GymdeskConfig,
    repositories: Arc<dyn RepositoryFactory>,
}

impl Server {
    pub fn new(config: GymdeskConfig, repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { config, repositories }
    }

    /// Connect to PostgreSQL and, unless skipped, apply pending migrations
    pub async fn connect(config: GymdeskConfig, run_migrations: bool) -> Result<Self> {
        let db = DatabaseConnection::new(config.database.clone())
            .await
            .context("Failed to connect to the database")?;

        if run_migrations {
            db.migrate().await.context("Failed to apply schema migrations")?;
        } else {
            tracing::warn!("Skipping schema migrations");
        }

        let repositories = Arc::new(SeaOrmRepositoryFactory::new(db));
        Ok(Self::new(config, repositories))
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let server = &self.config.server;

        let context = AppContext::new(
            self.repositories.clone(),
            Arc::new(JwtManager::new(&self.config.auth)),
            self.config.auth.bcrypt_cost,
        );
        let app = create_rest_app(context, AppConfig::from(server));

        // Innermost first: every `layer` call wraps the ones before it
        app.layer(RequestBodyLimitLayer::new(server.max_body_bytes))
            .layer(TimeoutLayer::new(server.request_timeout))
            .layer(from_fn(envelope_error_responses))
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(request_id_middleware))
            .layer(cors_layer(&server.cors))
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let host = self.config.server.bind_address.clone();
        let port = self.config.server.port;

        self.log_config_summary();

        let listener = tokio::net::TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", host, port))?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn log_config_summary(&self) {
        let server = &self.config.server;
        tracing::info!("=== Gymdesk Server Configuration ===");
        tracing::info!("Environment: {}", self.config.environment);
        tracing::info!("Bind Address: {}:{}", server.bind_address, server.port);
        tracing::info!("API Prefix: {}", server.api_prefix);
        tracing::info!("Database: {}", self.config.database.redacted_url());
        tracing::info!(
            "Rate Limit: {}",
            if server.rate_limit.enabled {
                format!(
                    "{} requests / {}s",
                    server.rate_limit.max_requests,
                    server.rate_limit.window.as_secs()
                )
            } else {
                "Disabled".to_string()
            }
        );
        tracing::info!("CORS Origins: {}", server.cors.allowed_origins.join(", "));
        tracing::info!("====================================");
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
