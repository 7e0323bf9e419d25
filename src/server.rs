use std::path::PathBuf;

use axum::{Router, routing::get};
use clap::Parser;
use tower_http::{compression::CompressionLayer, services::ServeDir};
use tracing::info;

use crate::util::Result;

#[derive(Parser)]
pub struct ServerConfig {
  #[clap(long, short, default_value = "127.0.0.1:4080")]
  bind: String,

  /// Directory containing metadata.json and pages/
  #[clap(long, short, default_value = "public")]
  dir: PathBuf,
}

/// Serve a harvested archive directory over HTTP. The front end only
/// needs GET /metadata.json and GET /pages/<slug>, both plain static
/// files.
pub async fn serve(config: ServerConfig) -> Result<()> {
  info!("listening on {}", config.bind);
  let listener = tokio::net::TcpListener::bind(&config.bind).await?;

  let app = Router::new()
    .route("/health", get(|| async { "ok" }))
    .fallback_service(ServeDir::new(&config.dir))
    .layer(CompressionLayer::new().gzip(true));

  info!("serving archive from {}", config.dir.display());
  Ok(axum::serve(listener, app).await?)
}
