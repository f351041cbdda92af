use crate::{l1::execution_layer::ExecutionLayer, l2::execution_layer::L2ExecutionLayer};
use alloy::providers::Provider;
use anyhow::Error;
use common::{config::Config, fork_info::ForkInfo};
use tracing::{info, warn};

/// Protocol clients for both layers of a Pacaya deployment.
pub struct PacayaClients<P> {
    pub l1: ExecutionLayer<P>,
    pub l2: Option<L2ExecutionLayer<P>>,
}

impl<P: Provider + Clone + 'static> PacayaClients<P> {
    pub async fn new(l1_provider: P, l2_provider: Option<P>, config: &Config) -> Result<Self, Error> {
        let l1 = ExecutionLayer::new(l1_provider, &config.contract_addresses, config.rpc_timeout)
            .await?;
        let l2 = l2_provider.map(|provider| {
            L2ExecutionLayer::new(
                provider,
                config.contract_addresses.taiko_anchor,
                config.rpc_timeout,
            )
        });
        Ok(Self { l1, l2 })
    }

    fn l2(&self) -> Result<&L2ExecutionLayer<P>, Error> {
        self.l2
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("L2 RPC URL is not configured"))
    }

    /// Checks that the L2 genesis block matches the one the inbox verified as batch 0.
    pub async fn ensure_genesis_matched(&self) -> Result<(), Error> {
        let l2 = self.l2()?;
        let node_genesis = l2.get_genesis_hash().await?;

        match self.l1.get_verified_genesis_hash().await? {
            Some(protocol_genesis) if protocol_genesis == node_genesis => {
                info!("Genesis hash matched: {}", node_genesis);
                Ok(())
            }
            Some(protocol_genesis) => Err(anyhow::anyhow!(
                "Genesis block hash mismatch, L2 node: {}, TaikoInbox: {}",
                node_genesis,
                protocol_genesis
            )),
            None => {
                warn!("Genesis block not found in TaikoInbox, skipping genesis check");
                Ok(())
            }
        }
    }

    /// Fork state of L2 at its current head.
    pub async fn get_fork_info(&self) -> Result<ForkInfo, Error> {
        let l2_height = self.l2()?.get_latest_block_number().await?;
        Ok(ForkInfo::new(
            self.l1.protocol_config().fork_heights,
            l2_height,
        ))
    }
}
