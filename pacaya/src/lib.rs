use alloy::providers::DynProvider;
use anyhow::Error;
use bindings::WatchOpts;
use chain_monitor::{ChainMonitor, LoggingHandler};
use common::{config::Config, shared::alloy_tools};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod chain_monitor;
pub mod clients;
pub mod l1;
pub mod l2;

pub use clients::PacayaClients;

/// Connects to both layers and builds the protocol clients. When a private
/// key is configured the L1 provider signs and sends transactions with it.
pub async fn create_pacaya_clients(config: &Config) -> Result<PacayaClients<DynProvider>, Error> {
    let l1_provider = match &config.private_key {
        Some(private_key) => {
            let signer = alloy_tools::signer_from_private_key(private_key)?;
            let (provider, address) =
                alloy_tools::create_alloy_provider_with_wallet(&config.l1_rpc_url, signer).await?;
            info!("L1 transactions are signed by {}", address);
            provider
        }
        None => alloy_tools::create_alloy_provider_without_wallet(&config.l1_rpc_url).await?,
    };

    let l2_provider = match &config.l2_rpc_url {
        Some(url) => Some(alloy_tools::create_alloy_provider_without_wallet(url).await?),
        None => None,
    };

    PacayaClients::new(l1_provider, l2_provider, config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Pacaya clients: {}", e))
}

/// Starts a chain monitor that logs every batch lifecycle event of the inbox.
pub fn start_chain_monitor(
    clients: &PacayaClients<DynProvider>,
    config: &Config,
    start_block: Option<u64>,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    ChainMonitor::new(
        clients.l1.inbox().clone(),
        Arc::new(LoggingHandler),
        WatchOpts {
            start: start_block,
            poll_interval: config.watch_poll_interval,
        },
        cancel_token,
    )
    .run()
}
