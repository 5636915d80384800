use anyhow::Context;
use quote_engine::{CatalogSnapshot, Config, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. .env, then configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Work directory and logging
    setup_environment(&config).context("failed to prepare work directory")?;

    let path = std::env::args()
        .nth(1)
        .or_else(|| config.catalog_path.clone())
        .context("usage: quote-engine <catalog.json> (or set CATALOG_PATH)")?;

    tracing::info!(path = %path, "Pricing catalog snapshot");

    // 3. Price every motor at the current time
    let snapshot = CatalogSnapshot::load(&path)
        .with_context(|| format!("failed to load catalog snapshot {path}"))?;
    let issues = snapshot.issues().len();
    if issues > 0 {
        tracing::warn!(issues, "Catalog contains malformed promotion data");
    }

    let priced = snapshot.priced(shared::util::now_millis());
    println!("{}", serde_json::to_string_pretty(&priced)?);

    tracing::info!(items = priced.len(), "Catalog priced");
    Ok(())
}
