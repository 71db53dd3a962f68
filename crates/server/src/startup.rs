use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{calculator::CalculatorService, object::GlobalObject, runtime};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Open storage and construct the one global object plus the calculator.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let storage = runtime::open_storage(&cfg.storage).await?;
    let object = GlobalObject::new(storage);
    // seed eagerly so the first page load does not pay for it
    object.ensure_seeded().await?;

    let calculator = CalculatorService::from_config(&cfg.calculator)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(AppState::new(object, calculator))
}

/// Build the app from `cfg` and run the HTTP server until `shutdown` resolves.
pub async fn run_with_shutdown<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    runtime::ensure_env(&cfg.server.frontend_dir, &cfg.storage.data_dir).await?;

    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors(), &cfg.server.frontend_dir);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {addr}: {e}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("serve: {e}"))?;
    info!("server stopped");
    Ok(())
}

/// Public entry: run until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    run_with_shutdown(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C, shutting down");
    })
    .await
}
