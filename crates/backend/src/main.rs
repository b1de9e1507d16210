use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, Method};
use clap::Parser;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use esp_backend::{
    app,
    auth::{AuthConfig, GoogleOAuthProvider},
    grants::InMemoryGrantSource,
    AppState,
};

#[derive(Parser)]
#[command(name = "esp-backend")]
#[command(about = "Serves the internal grants view behind the ethereum.org login gate")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    port: u16,

    /// JSON file with the grant records to serve.
    ///
    /// When omitted the internal grants list is empty.
    #[arg(long, env = "GRANTS_FILE")]
    grants_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let auth_config = AuthConfig::from_env().map_err(anyhow::Error::msg)?;
    let oauth = GoogleOAuthProvider::new(&auth_config);

    let grants = match &args.grants_file {
        Some(path) => {
            let source = InMemoryGrantSource::from_json_file(path)
                .context("Failed to load internal grants")?;
            tracing::info!("Loaded internal grants from {}", path.display());
            source
        }
        None => {
            tracing::warn!("GRANTS_FILE not set, serving an empty internal grants list");
            InMemoryGrantSource::default()
        }
    };

    let state = AppState {
        auth_config: Arc::new(auth_config),
        oauth: Arc::new(oauth),
        grants: Arc::new(grants),
    };

    let app = app(state)
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build CORS layer based on environment configuration.
///
/// If CORS_ALLOWED_ORIGINS is set, only those origins are allowed, with
/// credentials so the auth cookie is sent. Otherwise cross-origin requests
/// get no CORS headers at all.
fn build_cors_layer() -> CorsLayer {
    let origins: Vec<_> = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS_ALLOWED_ORIGINS not set, cross-origin requests are not allowed");
        return CorsLayer::new();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
