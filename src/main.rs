use anyhow::Result;
use seo_audit::{config::Config, http, load_env};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.runtime.log_level))
        .init();

    info!("Starting seo-audit server");

    http::start_http_server(config).await?;

    Ok(())
}
