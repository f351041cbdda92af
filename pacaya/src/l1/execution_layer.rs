use super::{protocol_config::ProtocolConfig, protocol_state::ProtocolState};
use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
};
use anyhow::Error;
use bindings::{
    FilterOpts,
    pacaya::{
        ComposeVerifierClient, SurgeProposerWrapperClient, SurgeVerifierClient, TaikoInboxClient,
        taiko_inbox::Batch,
    },
};
use common::{config::ContractAddresses, utils::rpc::with_timeout};
use std::time::Duration;
use tracing::{debug, info};

/// L1 side of the protocol: the inbox, the optional proposer wrapper and the
/// verifier the inbox delegates proofs to.
pub struct ExecutionLayer<P> {
    inbox: TaikoInboxClient<P>,
    proposer_wrapper: Option<SurgeProposerWrapperClient<P>>,
    verifier_address: Address,
    protocol_config: ProtocolConfig,
    rpc_timeout: Duration,
}

impl<P: Provider + Clone + 'static> ExecutionLayer<P> {
    pub async fn new(
        provider: P,
        contract_addresses: &ContractAddresses,
        rpc_timeout: Duration,
    ) -> Result<Self, Error> {
        let inbox = TaikoInboxClient::new(contract_addresses.taiko_inbox, provider.clone());

        let pacaya_config = with_timeout(
            rpc_timeout,
            "get pacaya config from TaikoInbox",
            inbox.pacaya_config(),
        )
        .await?;
        let protocol_config = ProtocolConfig::from(&pacaya_config);
        info!("Pacaya config: {}", protocol_config);

        let verifier_address =
            with_timeout(rpc_timeout, "get verifier from TaikoInbox", inbox.verifier()).await?;
        debug!("TaikoInbox verifier: {}", verifier_address);

        let proposer_wrapper = contract_addresses
            .surge_proposer_wrapper
            .map(|address| SurgeProposerWrapperClient::new(address, provider));

        Ok(Self {
            inbox,
            proposer_wrapper,
            verifier_address,
            protocol_config,
            rpc_timeout,
        })
    }

    pub fn inbox(&self) -> &TaikoInboxClient<P> {
        &self.inbox
    }

    pub fn proposer_wrapper(&self) -> Option<&SurgeProposerWrapperClient<P>> {
        self.proposer_wrapper.as_ref()
    }

    pub fn protocol_config(&self) -> &ProtocolConfig {
        &self.protocol_config
    }

    pub fn verifier_address(&self) -> Address {
        self.verifier_address
    }

    /// Client for the verifier as a compose verifier. Which flavour is deployed
    /// behind the inbox is a deployment choice, callers pick the one they expect.
    pub fn compose_verifier(&self) -> ComposeVerifierClient<P> {
        ComposeVerifierClient::new(self.verifier_address, self.inbox.provider().clone())
    }

    pub fn surge_verifier(&self) -> SurgeVerifierClient<P> {
        SurgeVerifierClient::new(self.verifier_address, self.inbox.provider().clone())
    }

    pub async fn get_l1_height(&self) -> Result<u64, Error> {
        with_timeout(
            self.rpc_timeout,
            "get L1 block number",
            self.inbox.provider().get_block_number(),
        )
        .await
    }

    pub async fn get_protocol_state(&self) -> Result<ProtocolState, Error> {
        let state = with_timeout(self.rpc_timeout, "get inbox state", self.inbox.state()).await?;
        let last_verified = with_timeout(
            self.rpc_timeout,
            "get last verified transition",
            self.inbox.get_last_verified_transition(),
        )
        .await?;
        let last_synced = with_timeout(
            self.rpc_timeout,
            "get last synced transition",
            self.inbox.get_last_synced_transition(),
        )
        .await?;
        Ok(ProtocolState {
            stats1: state.stats1,
            stats2: state.stats2,
            last_verified,
            last_synced,
        })
    }

    pub async fn get_batch(&self, batch_id: u64) -> Result<Batch, Error> {
        with_timeout(
            self.rpc_timeout,
            &format!("get batch {batch_id}"),
            self.inbox.get_batch(batch_id),
        )
        .await
    }

    pub async fn get_bond_balance(&self, user: Address) -> Result<U256, Error> {
        with_timeout(
            self.rpc_timeout,
            &format!("get bond balance of {user}"),
            self.inbox.bond_balance_of(user),
        )
        .await
    }

    /// Block hash recorded when the genesis batch was verified, searched for
    /// in the L1 block the inbox was initialized in.
    pub async fn get_verified_genesis_hash(&self) -> Result<Option<B256>, Error> {
        let stats1 =
            with_timeout(self.rpc_timeout, "get inbox stats1", self.inbox.get_stats1()).await?;
        let genesis_height = stats1.genesisHeight;

        let verified = with_timeout(
            self.rpc_timeout,
            "filter BatchesVerified at genesis height",
            self.inbox
                .filter_batches_verified(&FilterOpts::range(genesis_height, genesis_height)),
        )
        .await?;

        for log in verified {
            let log = log?;
            if log.event.batchId == 0 {
                return Ok(Some(log.event.blockHash));
            }
        }
        Ok(None)
    }
}
