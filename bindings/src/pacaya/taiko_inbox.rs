use super::essential::EssentialContractClient;
use crate::contract::{
    BoundContract, CallOpts, DecodedLog, EventSubscription, FilterOpts, IndexedFilter, LogIterator,
    TransactOpts, WatchOpts,
};
use crate::error::BindingError;
use alloy::{
    json_abi::JsonAbi,
    network::Ethereum,
    primitives::{Address, B256, Bytes, U256, aliases::U24},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::Log,
    sol,
};
use tokio::sync::mpsc::Sender;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    TaikoInbox,
    "src/pacaya/abi/TaikoInbox.json"
);

pub use ITaikoInbox::{
    Batch, BatchInfo, BatchMetadata, BlockParams, Config, ForkHeights, Stats1, Stats2, Transition,
    TransitionState,
};
pub use LibSharedData::BaseFeeConfig;
pub use TaikoInbox::{
    BatchProposed, BatchesProved, BatchesRollbacked, BatchesVerified, BondCredited, BondDebited,
    BondDeposited, BondWithdrawn, ConflictingProof, Stats1Updated, Stats2Updated,
};

pub const ABI: &str = include_str!("abi/TaikoInbox.json");

pub fn abi() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(ABI)
}

/// A transition together with the batch and last block it belongs to, as
/// returned by `getLastSyncedTransition` and `getLastVerifiedTransition`.
#[derive(Clone, Debug)]
pub struct BatchTransition {
    pub batch_id: u64,
    pub block_id: u64,
    pub ts: TransitionState,
}

#[derive(Clone, Debug)]
pub struct InboxState {
    pub stats1: Stats1,
    pub stats2: Stats2,
}

/// L1 inbox of the Pacaya fork. Batches are proposed, proved and verified here.
#[derive(Clone, Debug)]
pub struct TaikoInboxClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> TaikoInboxClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: BoundContract::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn provider(&self) -> &P {
        self.contract.provider()
    }

    pub fn with_call_opts(&self, call_opts: CallOpts) -> Self {
        Self {
            contract: self.contract.clone().with_call_opts(call_opts),
        }
    }

    pub fn with_transact_opts(&self, transact_opts: TransactOpts) -> Self {
        Self {
            contract: self.contract.clone().with_transact_opts(transact_opts),
        }
    }

    pub fn instance(&self) -> TaikoInbox::TaikoInboxInstance<P> {
        TaikoInbox::new(self.contract.address(), self.contract.provider().clone())
    }

    pub fn essential(&self) -> EssentialContractClient<P> {
        EssentialContractClient::from_bound(self.contract.clone())
    }

    // Calls

    pub async fn bond_balance_of(&self, user: Address) -> Result<U256, BindingError> {
        self.contract
            .call(&TaikoInbox::bondBalanceOfCall { _user: user })
            .await
    }

    pub async fn bond_token(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoInbox::bondTokenCall {}).await
    }

    pub async fn dao(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoInbox::daoCall {}).await
    }

    pub async fn get_batch(&self, batch_id: u64) -> Result<Batch, BindingError> {
        self.contract
            .call(&TaikoInbox::getBatchCall { _batchId: batch_id })
            .await
    }

    pub async fn get_batch_verifying_transition(
        &self,
        batch_id: u64,
    ) -> Result<TransitionState, BindingError> {
        self.contract
            .call(&TaikoInbox::getBatchVerifyingTransitionCall { _batchId: batch_id })
            .await
    }

    pub async fn get_last_synced_transition(&self) -> Result<BatchTransition, BindingError> {
        let ret = self
            .contract
            .call(&TaikoInbox::getLastSyncedTransitionCall {})
            .await?;
        Ok(BatchTransition {
            batch_id: ret.batchId_,
            block_id: ret.blockId_,
            ts: ret.ts_,
        })
    }

    pub async fn get_last_verified_transition(&self) -> Result<BatchTransition, BindingError> {
        let ret = self
            .contract
            .call(&TaikoInbox::getLastVerifiedTransitionCall {})
            .await?;
        Ok(BatchTransition {
            batch_id: ret.batchId_,
            block_id: ret.blockId_,
            ts: ret.ts_,
        })
    }

    pub async fn get_stats1(&self) -> Result<Stats1, BindingError> {
        self.contract.call(&TaikoInbox::getStats1Call {}).await
    }

    pub async fn get_stats2(&self) -> Result<Stats2, BindingError> {
        self.contract.call(&TaikoInbox::getStats2Call {}).await
    }

    pub async fn get_transitions_by_id(
        &self,
        batch_id: u64,
        tid: U24,
    ) -> Result<Vec<TransitionState>, BindingError> {
        self.contract
            .call(&TaikoInbox::getTransitionsByIdCall {
                _batchId: batch_id,
                _tid: tid,
            })
            .await
    }

    pub async fn get_transitions_by_parent_hash(
        &self,
        batch_id: u64,
        parent_hash: B256,
    ) -> Result<Vec<TransitionState>, BindingError> {
        self.contract
            .call(&TaikoInbox::getTransitionsByParentHashCall {
                _batchId: batch_id,
                _parentHash: parent_hash,
            })
            .await
    }

    pub async fn get_verification_streak_started_at(&self) -> Result<U256, BindingError> {
        self.contract
            .call(&TaikoInbox::getVerificationStreakStartedAtCall {})
            .await
    }

    pub async fn inbox_wrapper(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoInbox::inboxWrapperCall {}).await
    }

    pub async fn is_on_l1(&self) -> Result<bool, BindingError> {
        self.contract.call(&TaikoInbox::isOnL1Call {}).await
    }

    pub async fn pacaya_config(&self) -> Result<Config, BindingError> {
        self.contract.call(&TaikoInbox::pacayaConfigCall {}).await
    }

    pub async fn signal_service(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoInbox::signalServiceCall {}).await
    }

    pub async fn state(&self) -> Result<InboxState, BindingError> {
        let ret = self.contract.call(&TaikoInbox::stateCall {}).await?;
        Ok(InboxState {
            stats1: ret.stats1,
            stats2: ret.stats2,
        })
    }

    /// Address of the proof verifier the inbox delegates to.
    pub async fn verifier(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoInbox::verifierCall {}).await
    }

    // Transactions

    pub async fn deposit_bond(
        &self,
        amount: U256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::depositBondCall { _amount: amount })
            .await
    }

    pub async fn init(
        &self,
        owner: Address,
        genesis_block_hash: B256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::initCall {
                _owner: owner,
                _genesisBlockHash: genesis_block_hash,
            })
            .await
    }

    pub async fn propose_batch(
        &self,
        params: Bytes,
        tx_list: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::proposeBatchCall {
                _params: params,
                _txList: tx_list,
            })
            .await
    }

    pub async fn propose_with_proof(
        &self,
        propose_params: Bytes,
        tx_list: Bytes,
        prove_params: Bytes,
        proof: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::proposeWithProofCall {
                _proposeParams: propose_params,
                _txList: tx_list,
                _proveParams: prove_params,
                _proof: proof,
            })
            .await
    }

    pub async fn prove_batches(
        &self,
        params: Bytes,
        proof: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::proveBatchesCall {
                _params: params,
                _proof: proof,
            })
            .await
    }

    pub async fn rollback_batches(
        &self,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::rollbackBatchesCall {})
            .await
    }

    pub async fn set_propose_with_proof_mode(
        &self,
        enabled: bool,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::setProposeWithProofModeCall { _enabled: enabled })
            .await
    }

    pub async fn verify_batches(
        &self,
        length: u64,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::verifyBatchesCall { _length: length })
            .await
    }

    pub async fn withdraw_bond(
        &self,
        amount: U256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoInbox::withdrawBondCall { _amount: amount })
            .await
    }

    // Events

    pub async fn filter_batch_proposed(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<BatchProposed>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_batch_proposed(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BatchProposed>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_batch_proposed(&self, log: &Log) -> Result<BatchProposed, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_batches_proved(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<BatchesProved>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_batches_proved(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BatchesProved>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_batches_proved(&self, log: &Log) -> Result<BatchesProved, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_batches_rollbacked(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<BatchesRollbacked>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_batches_rollbacked(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BatchesRollbacked>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_batches_rollbacked(&self, log: &Log) -> Result<BatchesRollbacked, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_batches_verified(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<BatchesVerified>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_batches_verified(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BatchesVerified>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_batches_verified(&self, log: &Log) -> Result<BatchesVerified, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_bond_credited(
        &self,
        opts: &FilterOpts,
        user: &[Address],
    ) -> Result<LogIterator<BondCredited>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(user))
            .await
    }

    pub async fn watch_bond_credited(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BondCredited>>,
        user: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(user), sink)
            .await
    }

    pub fn parse_bond_credited(&self, log: &Log) -> Result<BondCredited, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_bond_debited(
        &self,
        opts: &FilterOpts,
        user: &[Address],
    ) -> Result<LogIterator<BondDebited>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(user))
            .await
    }

    pub async fn watch_bond_debited(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BondDebited>>,
        user: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(user), sink)
            .await
    }

    pub fn parse_bond_debited(&self, log: &Log) -> Result<BondDebited, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_bond_deposited(
        &self,
        opts: &FilterOpts,
        user: &[Address],
    ) -> Result<LogIterator<BondDeposited>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(user))
            .await
    }

    pub async fn watch_bond_deposited(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BondDeposited>>,
        user: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(user), sink)
            .await
    }

    pub fn parse_bond_deposited(&self, log: &Log) -> Result<BondDeposited, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_bond_withdrawn(
        &self,
        opts: &FilterOpts,
        user: &[Address],
    ) -> Result<LogIterator<BondWithdrawn>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(user))
            .await
    }

    pub async fn watch_bond_withdrawn(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BondWithdrawn>>,
        user: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(user), sink)
            .await
    }

    pub fn parse_bond_withdrawn(&self, log: &Log) -> Result<BondWithdrawn, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_conflicting_proof(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<ConflictingProof>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_conflicting_proof(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<ConflictingProof>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_conflicting_proof(&self, log: &Log) -> Result<ConflictingProof, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_stats1_updated(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<Stats1Updated>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_stats1_updated(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Stats1Updated>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_stats1_updated(&self, log: &Log) -> Result<Stats1Updated, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_stats2_updated(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<Stats2Updated>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_stats2_updated(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Stats2Updated>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_stats2_updated(&self, log: &Log) -> Result<Stats2Updated, BindingError> {
        self.contract.unpack_log(log)
    }
}
