use tracing::info;

use suitepager_web::SuitePagerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config file from SUITEPAGER_CONFIG (default ./suitepager.toml), then
    // SUITEPAGER_ADDR / SUITEPAGER_REPORTER_URL / SUITEPAGER_CATALOG /
    // SUITEPAGER_ASSETS_DIR overrides.
    let cfg = SuitePagerConfig::from_env()?;

    info!(
        "Starting SuitePager on http://{} (reporter: {})",
        cfg.listen, cfg.reporter_url
    );

    suitepager_web::server::serve(cfg.listen, cfg).await
}
