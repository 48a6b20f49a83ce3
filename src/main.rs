use eyre::Result;
use jwks_refresher::Config;
use keystore::Storage;
use dotenv_flow::dotenv_flow;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load dotenv-flow variables
    dotenv_flow().ok();

    // Enable logging
    config_tracing();

    let config = Config::from_env()?;
    info!(url = %config.url, interval = ?config.refresh_interval, "starting key set cache");

    let cancel = CancellationToken::new();
    let storage = Storage::from_http(config.url.clone(), config.storage_options(), cancel.clone()).await?;
    info!(keys = storage.key_read_all().len(), "key set cache ready");

    tokio::signal::ctrl_c().await?;
    info!("shutting down gracefully");
    cancel.cancel();
    if let Some(task) = storage.take_refresh_task() {
        task.await?;
    }

    Ok(())
}

fn config_tracing() {
    let tracing_layer = tracing_subscriber::fmt::layer();
    let filter = filter::Targets::new()
        .with_target("hyper", tracing::Level::INFO)
        .with_target("reqwest", tracing::Level::INFO)
        .with_default(tracing::Level::DEBUG);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}
