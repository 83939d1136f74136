mod config;

use std::sync::Arc;

use axum::Router;
use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use darkroom_api::auth::{AppState, AppStateInner};
use darkroom_api::routes;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "darkroom=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = darkroom_db::Database::open(&config.db_path)?;
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: config.jwt_secret.clone(),
        token_ttl: config.token_ttl,
    });

    let mut app = routes::router(state);

    if config.is_production() {
        match &config.static_dir {
            Some(dir) => {
                info!("Serving client build from {}", dir.display());
                let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
                app = app.fallback_service(spa);
            }
            None => warn!("DARKROOM_STATIC_DIR not set, serving the API only"),
        }
    }

    let app: Router = app
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    info!(
        "Darkroom server listening on {} ({:?})",
        config.addr, config.env
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Development pins the browser origin to the dev client; production mirrors
/// whatever origin asks, since the client is served from this process.
fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = if config.is_production() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(&config.client_url)?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {e}");
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
