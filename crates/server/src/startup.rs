use std::{net::SocketAddr, sync::Arc};

use axum::http::HeaderValue;
use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::attachments::backend_from_config;
use service::auth::{AccessGate, TokenVerifier};
use service::runtime;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

/// Explicit origins when configured, permissive otherwise.
fn build_cors(cfg: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
        .collect();
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    CorsLayer::very_permissive().allow_origin(AllowOrigin::list(origins))
}

fn bind_addr(cfg: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", cfg.host, cfg.port)))
}

/// Connect, migrate and wire every component from a validated configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    cfg.auth.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Any(anyhow::anyhow!("database connect failed: {e}")))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Any(anyhow::anyhow!("migrations failed: {e}")))?;
        info!("migrations applied");
    }

    runtime::ensure_storage(&cfg.storage).await?;
    let backend = backend_from_config(&cfg.storage)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;

    if cfg.uses_dev_secret() {
        warn!("ALLOW_DEV_SECRET is set; tokens are verified with the development secret");
    }
    let gate = AccessGate::new(TokenVerifier::new(&cfg.auth.jwt_secret), cfg.auth.tenant_header.clone());
    let state = ServerState::new(db, gate, Arc::clone(&backend));

    Ok(routes::build_router(state, build_cors(&cfg.server), cfg.storage.max_upload_bytes))
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, storage = ?cfg.storage.backend, tenant_header = %cfg.auth.tenant_header, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_falls_back_to_permissive() {
        // building either variant must not panic
        let _ = build_cors(&ServerConfig::default());
        let cfg = ServerConfig { cors_origins: vec!["http://localhost:3000".into()], ..ServerConfig::default() };
        let _ = build_cors(&cfg);
    }

    #[test]
    fn bind_addr_rejects_bad_hosts() {
        let cfg = ServerConfig { host: "not a host".into(), ..ServerConfig::default() };
        assert!(bind_addr(&cfg).is_err());
        let cfg = ServerConfig { host: "0.0.0.0".into(), port: 8002, ..ServerConfig::default() };
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8002);
    }

    #[tokio::test]
    async fn build_app_refuses_missing_secret() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        let err = build_app(&cfg).await.err();
        assert!(matches!(err, Some(StartupError::InvalidConfig(_))));
    }
}
