pub mod api;
pub mod config;
pub mod lookup;
pub mod market;
pub mod session;
pub mod texts;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::lookup::{build_completion_client, DrugLookup};
use crate::market::{MarketCatalog, MarketClient};

/// Start the HTTP API and serve until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env().context("invalid configuration")?;

    // The completion clients are blocking; build them off the async workers.
    let completion = config.completion.clone();
    let lookup = tokio::task::spawn_blocking(move || {
        build_completion_client(&completion)
            .map(|client| DrugLookup::new(client).with_max_retries(completion.max_retries))
    })
    .await
    .context("completion client setup task failed")?;

    let lookup = match lookup {
        Ok(lookup) => {
            tracing::info!(
                provider = ?config.completion.provider,
                model = %lookup.model(),
                timeout_secs = config.completion.timeout_secs,
                max_retries = config.completion.max_retries,
                "Drug lookup ready"
            );
            Some(lookup)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Drug lookup disabled");
            None
        }
    };

    let catalog = match &config.data_dir {
        Some(dir) => MarketCatalog::load_dir(dir)
            .with_context(|| format!("cannot load marketplace fixtures from {}", dir.display()))?,
        None => MarketCatalog::embedded().context("embedded marketplace fixtures are invalid")?,
    };

    let remote = config
        .market_base_url
        .as_deref()
        .map(MarketClient::new)
        .transpose()
        .context("cannot create marketplace client")?;

    let ctx = api::ApiContext::new(lookup, catalog, remote);
    tracing::info!(market = %ctx.market.describe(), "Marketplace pages source");

    let server = api::start_api_server(ctx, config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    tracing::info!(addr = %server.addr, started_at = %server.started_at, "Listening");

    tokio::signal::ctrl_c()
        .await
        .context("cannot listen for shutdown signal")?;
    server.shutdown().await;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
