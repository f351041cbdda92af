use super::essential::EssentialContractClient;
use crate::contract::{
    BoundContract, CallOpts, DecodedLog, EventSubscription, FilterOpts, IndexedFilter, LogIterator,
    TransactOpts, WatchOpts,
};
use crate::error::BindingError;
use alloy::{
    json_abi::JsonAbi,
    network::Ethereum,
    primitives::{Address, B256, U256},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::Log,
    sol,
};
use tokio::sync::mpsc::Sender;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    TaikoAnchor,
    "src/pacaya/abi/TaikoAnchor.json"
);

pub use LibSharedData::BaseFeeConfig;
pub use TaikoAnchor::{Anchored, EIP1559Update, OwnershipTransferStarted};

pub const ABI: &str = include_str!("abi/TaikoAnchor.json");

pub fn abi() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(ABI)
}

/// Base fee returned by `calculateBaseFee` and `getBasefee`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseFee {
    pub basefee: U256,
    pub parent_gas_excess: u64,
}

/// Base fee returned by `getBasefeeV2`, which also reports the new gas target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseFeeV2 {
    pub basefee: U256,
    pub new_gas_target: u64,
    pub new_gas_excess: u64,
}

/// L2 anchor contract. Its `anchor*` transactions are sent by the golden
/// touch account as the first transaction of every L2 block.
#[derive(Clone, Debug)]
pub struct TaikoAnchorClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> TaikoAnchorClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: BoundContract::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
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

    pub fn instance(&self) -> TaikoAnchor::TaikoAnchorInstance<P> {
        TaikoAnchor::new(self.contract.address(), self.contract.provider().clone())
    }

    pub fn essential(&self) -> EssentialContractClient<P> {
        EssentialContractClient::from_bound(self.contract.clone())
    }

    // Calls

    pub async fn golden_touch_address(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&TaikoAnchor::GOLDEN_TOUCH_ADDRESSCall {})
            .await
    }

    pub async fn adjust_excess(
        &self,
        curr_gas_excess: u64,
        curr_gas_target: u64,
        new_gas_target: u64,
    ) -> Result<u64, BindingError> {
        self.contract
            .call(&TaikoAnchor::adjustExcessCall {
                _currGasExcess: curr_gas_excess,
                _currGasTarget: curr_gas_target,
                _newGasTarget: new_gas_target,
            })
            .await
    }

    pub async fn calculate_base_fee(
        &self,
        base_fee_config: impl Into<BaseFeeConfig>,
        blocktime: u64,
        parent_gas_excess: u64,
        parent_gas_used: u32,
    ) -> Result<BaseFee, BindingError> {
        let ret = self
            .contract
            .call(&TaikoAnchor::calculateBaseFeeCall {
                _baseFeeConfig: base_fee_config.into(),
                _blocktime: blocktime,
                _parentGasExcess: parent_gas_excess,
                _parentGasUsed: parent_gas_used,
            })
            .await?;
        Ok(BaseFee {
            basefee: ret.basefee_,
            parent_gas_excess: ret.parentGasExcess_,
        })
    }

    pub async fn get_basefee(
        &self,
        anchor_block_id: u64,
        parent_gas_used: u32,
    ) -> Result<BaseFee, BindingError> {
        let ret = self
            .contract
            .call(&TaikoAnchor::getBasefeeCall {
                _anchorBlockId: anchor_block_id,
                _parentGasUsed: parent_gas_used,
            })
            .await?;
        Ok(BaseFee {
            basefee: ret.basefee_,
            parent_gas_excess: ret.parentGasExcess_,
        })
    }

    pub async fn get_basefee_v2(
        &self,
        parent_gas_used: u32,
        block_timestamp: u64,
        base_fee_config: impl Into<BaseFeeConfig>,
    ) -> Result<BaseFeeV2, BindingError> {
        let ret = self
            .contract
            .call(&TaikoAnchor::getBasefeeV2Call {
                _parentGasUsed: parent_gas_used,
                _blockTimestamp: block_timestamp,
                _baseFeeConfig: base_fee_config.into(),
            })
            .await?;
        Ok(BaseFeeV2 {
            basefee: ret.basefee_,
            new_gas_target: ret.newGasTarget_,
            new_gas_excess: ret.newGasExcess_,
        })
    }

    pub async fn get_block_hash(&self, block_id: U256) -> Result<B256, BindingError> {
        self.contract
            .call(&TaikoAnchor::getBlockHashCall { _blockId: block_id })
            .await
    }

    pub async fn is_on_l1(&self) -> Result<bool, BindingError> {
        self.contract.call(&TaikoAnchor::isOnL1Call {}).await
    }

    pub async fn l1_chain_id(&self) -> Result<u64, BindingError> {
        self.contract.call(&TaikoAnchor::l1ChainIdCall {}).await
    }

    pub async fn last_synced_block(&self) -> Result<u64, BindingError> {
        self.contract.call(&TaikoAnchor::lastSyncedBlockCall {}).await
    }

    pub async fn pacaya_fork_height(&self) -> Result<u64, BindingError> {
        self.contract
            .call(&TaikoAnchor::pacayaForkHeightCall {})
            .await
    }

    pub async fn parent_gas_excess(&self) -> Result<u64, BindingError> {
        self.contract.call(&TaikoAnchor::parentGasExcessCall {}).await
    }

    pub async fn parent_gas_target(&self) -> Result<u64, BindingError> {
        self.contract.call(&TaikoAnchor::parentGasTargetCall {}).await
    }

    pub async fn parent_timestamp(&self) -> Result<u64, BindingError> {
        self.contract.call(&TaikoAnchor::parentTimestampCall {}).await
    }

    pub async fn pending_owner(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoAnchor::pendingOwnerCall {}).await
    }

    pub async fn public_input_hash(&self) -> Result<B256, BindingError> {
        self.contract.call(&TaikoAnchor::publicInputHashCall {}).await
    }

    pub async fn signal_service(&self) -> Result<Address, BindingError> {
        self.contract.call(&TaikoAnchor::signalServiceCall {}).await
    }

    pub async fn skip_fee_check(&self) -> Result<bool, BindingError> {
        self.contract.call(&TaikoAnchor::skipFeeCheckCall {}).await
    }

    // Transactions

    pub async fn accept_ownership(
        &self,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::acceptOwnershipCall {})
            .await
    }

    /// Legacy anchor, rejected by the contract once Ontake is active.
    pub async fn anchor(
        &self,
        l1_block_hash: B256,
        l1_state_root: B256,
        l1_block_id: u64,
        parent_gas_used: u32,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::anchorCall {
                _l1BlockHash: l1_block_hash,
                _l1StateRoot: l1_state_root,
                _l1BlockId: l1_block_id,
                _parentGasUsed: parent_gas_used,
            })
            .await
    }

    pub async fn anchor_v2(
        &self,
        anchor_block_id: u64,
        anchor_state_root: B256,
        parent_gas_used: u32,
        base_fee_config: impl Into<BaseFeeConfig>,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::anchorV2Call {
                _anchorBlockId: anchor_block_id,
                _anchorStateRoot: anchor_state_root,
                _parentGasUsed: parent_gas_used,
                _baseFeeConfig: base_fee_config.into(),
            })
            .await
    }

    pub async fn anchor_v3(
        &self,
        anchor_block_id: u64,
        anchor_state_root: B256,
        parent_gas_used: u32,
        base_fee_config: impl Into<BaseFeeConfig>,
        signal_slots: Vec<B256>,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::anchorV3Call {
                _anchorBlockId: anchor_block_id,
                _anchorStateRoot: anchor_state_root,
                _parentGasUsed: parent_gas_used,
                _baseFeeConfig: base_fee_config.into(),
                _signalSlots: signal_slots,
            })
            .await
    }

    pub async fn init(
        &self,
        owner: Address,
        l1_chain_id: u64,
        initial_gas_excess: u64,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::initCall {
                _owner: owner,
                _l1ChainId: l1_chain_id,
                _initialGasExcess: initial_gas_excess,
            })
            .await
    }

    /// Withdraws `token` (or ether when `token` is zero) held by the anchor to `to`.
    pub async fn withdraw(
        &self,
        token: Address,
        to: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&TaikoAnchor::withdrawCall {
                _token: token,
                _to: to,
            })
            .await
    }

    // Events

    pub async fn filter_anchored(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<Anchored>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_anchored(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Anchored>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_anchored(&self, log: &Log) -> Result<Anchored, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_eip1559_update(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<EIP1559Update>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_eip1559_update(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<EIP1559Update>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_eip1559_update(&self, log: &Log) -> Result<EIP1559Update, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_ownership_transfer_started(
        &self,
        opts: &FilterOpts,
        previous_owner: &[Address],
        new_owner: &[Address],
    ) -> Result<LogIterator<OwnershipTransferStarted>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::addresses(previous_owner, new_owner))
            .await
    }

    pub async fn watch_ownership_transfer_started(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<OwnershipTransferStarted>>,
        previous_owner: &[Address],
        new_owner: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(
                opts,
                &IndexedFilter::addresses(previous_owner, new_owner),
                sink,
            )
            .await
    }

    pub fn parse_ownership_transfer_started(
        &self,
        log: &Log,
    ) -> Result<OwnershipTransferStarted, BindingError> {
        self.contract.unpack_log(log)
    }
}
