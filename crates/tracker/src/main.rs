use hwbot_common::config::AppConfig;
use hwbot_notifier::{Notifier, TelegramClient};
use hwbot_tracker::client::PracticumClient;
use hwbot_tracker::poller::StatusPoller;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hwbot_tracker=debug,hwbot_notifier=info,hwbot_decoders=info,hwbot_engine=info"
                    .into()
            }),
        )
        .json()
        .init();

    tracing::info!("Homework status bot starting...");

    // Missing credentials must stop us before the first poll
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    let client = PracticumClient::from_config(&config)?;
    let telegram = TelegramClient::from_config(&config)?;
    let mut poller = StatusPoller::new(client, Notifier::new(telegram), &config);

    // Run until Ctrl+C
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Homework status bot stopped.");
    Ok(())
}
