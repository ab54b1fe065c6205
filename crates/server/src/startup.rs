use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, SessionConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

/// Config from `config.toml` (or `CONFIG_PATH`). Only a missing file falls
/// back to the environment; a broken one stops startup.
pub fn load_config() -> Result<AppConfig, StartupError> {
    load_config_from(&configs::default_path())
}

pub fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    let cfg = AppConfig::load_from_path_or_env(path).map_err(|e| StartupError::InvalidConfig(format!("{:#}", e)))?;
    if cfg.session.uses_dev_secret() {
        warn!("SESSION_SECRET not set; using the development secret");
    }
    Ok(cfg)
}

/// Wire the handler state around an already migrated database.
pub fn build_state(db: DatabaseConnection, session: &SessionConfig) -> ServerState {
    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let auth = AuthService::new(repo, AuthConfig::new(session.secret.clone(), session.ttl_secs));
    ServerState { db, auth: Arc::new(auth), cookie_secure: session.cookie_secure }
}

/// Connect, migrate, and build the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    Ok(routes::build_router(build_state(db, &cfg.session)))
}

/// Resolves on Ctrl+C. If the signal handler cannot be installed the server
/// keeps running until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, draining connections"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// Serve `cfg` until Ctrl+C, then let in-flight requests finish.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, sqlite = cfg.database.is_sqlite(), "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server drained");
    Ok(())
}
