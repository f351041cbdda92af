#![allow(clippy::too_many_arguments)]

use crate::contract::{
    BoundContract, CallOpts, DecodedLog, EventSubscription, FilterOpts, IndexedFilter, LogIterator,
    TransactOpts, WatchOpts,
};
use crate::error::BindingError;
use alloy::{
    network::Ethereum,
    primitives::{Address, B256, Bytes},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::Log,
    sol,
};
use tokio::sync::mpsc::Sender;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    interface IEssentialContract {
        event AdminChanged(address previousAdmin, address newAdmin);
        event BeaconUpgraded(address indexed beacon);
        event Initialized(uint8 version);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
        event Paused(address account);
        event Unpaused(address account);
        event Upgraded(address indexed implementation);

        function impl() external view returns (address);
        function inNonReentrant() external view returns (bool);
        function owner() external view returns (address);
        function paused() external view returns (bool);
        function proxiableUUID() external view returns (bytes32);
        function resolver() external view returns (address);

        function pause() external;
        function unpause() external;
        function renounceOwnership() external;
        function transferOwnership(address newOwner) external;
        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes data) external payable;
    }
);

use IEssentialContract::{
    AdminChanged, BeaconUpgraded, Initialized, OwnershipTransferred, Paused, Unpaused, Upgraded,
};

/// Ownership, pausing and UUPS upgrade surface shared by the protocol's
/// upgradeable contracts (inbox, anchor and the proof verifiers).
#[derive(Clone, Debug)]
pub struct EssentialContractClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> EssentialContractClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self::from_bound(BoundContract::new(address, provider))
    }

    pub(crate) fn from_bound(contract: BoundContract<P>) -> Self {
        Self { contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn with_call_opts(&self, call_opts: CallOpts) -> Self {
        Self::from_bound(self.contract.clone().with_call_opts(call_opts))
    }

    pub fn with_transact_opts(&self, transact_opts: TransactOpts) -> Self {
        Self::from_bound(self.contract.clone().with_transact_opts(transact_opts))
    }

    // Calls

    /// Address of the current implementation behind the proxy.
    pub async fn implementation(&self) -> Result<Address, BindingError> {
        self.contract.call(&IEssentialContract::implCall {}).await
    }

    pub async fn in_non_reentrant(&self) -> Result<bool, BindingError> {
        self.contract
            .call(&IEssentialContract::inNonReentrantCall {})
            .await
    }

    pub async fn owner(&self) -> Result<Address, BindingError> {
        self.contract.call(&IEssentialContract::ownerCall {}).await
    }

    pub async fn paused(&self) -> Result<bool, BindingError> {
        self.contract.call(&IEssentialContract::pausedCall {}).await
    }

    pub async fn proxiable_uuid(&self) -> Result<B256, BindingError> {
        self.contract
            .call(&IEssentialContract::proxiableUUIDCall {})
            .await
    }

    pub async fn resolver(&self) -> Result<Address, BindingError> {
        self.contract.call(&IEssentialContract::resolverCall {}).await
    }

    // Transactions

    pub async fn pause(&self) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract.transact(&IEssentialContract::pauseCall {}).await
    }

    pub async fn unpause(&self) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&IEssentialContract::unpauseCall {})
            .await
    }

    pub async fn renounce_ownership(
        &self,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&IEssentialContract::renounceOwnershipCall {})
            .await
    }

    pub async fn transfer_ownership(
        &self,
        new_owner: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&IEssentialContract::transferOwnershipCall {
                newOwner: new_owner,
            })
            .await
    }

    pub async fn upgrade_to(
        &self,
        new_implementation: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&IEssentialContract::upgradeToCall {
                newImplementation: new_implementation,
            })
            .await
    }

    pub async fn upgrade_to_and_call(
        &self,
        new_implementation: Address,
        data: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&IEssentialContract::upgradeToAndCallCall {
                newImplementation: new_implementation,
                data,
            })
            .await
    }

    // Events

    pub async fn filter_admin_changed(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<AdminChanged>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_admin_changed(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<AdminChanged>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_admin_changed(&self, log: &Log) -> Result<AdminChanged, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_beacon_upgraded(
        &self,
        opts: &FilterOpts,
        beacon: &[Address],
    ) -> Result<LogIterator<BeaconUpgraded>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(beacon))
            .await
    }

    pub async fn watch_beacon_upgraded(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<BeaconUpgraded>>,
        beacon: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(beacon), sink)
            .await
    }

    pub fn parse_beacon_upgraded(&self, log: &Log) -> Result<BeaconUpgraded, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_initialized(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<Initialized>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_initialized(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Initialized>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_initialized(&self, log: &Log) -> Result<Initialized, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_ownership_transferred(
        &self,
        opts: &FilterOpts,
        previous_owner: &[Address],
        new_owner: &[Address],
    ) -> Result<LogIterator<OwnershipTransferred>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::addresses(previous_owner, new_owner))
            .await
    }

    pub async fn watch_ownership_transferred(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<OwnershipTransferred>>,
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

    pub fn parse_ownership_transferred(
        &self,
        log: &Log,
    ) -> Result<OwnershipTransferred, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_paused(&self, opts: &FilterOpts) -> Result<LogIterator<Paused>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_paused(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Paused>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_paused(&self, log: &Log) -> Result<Paused, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_unpaused(
        &self,
        opts: &FilterOpts,
    ) -> Result<LogIterator<Unpaused>, BindingError> {
        self.contract.filter_logs(opts, &IndexedFilter::any()).await
    }

    pub async fn watch_unpaused(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Unpaused>>,
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::any(), sink)
            .await
    }

    pub fn parse_unpaused(&self, log: &Log) -> Result<Unpaused, BindingError> {
        self.contract.unpack_log(log)
    }

    pub async fn filter_upgraded(
        &self,
        opts: &FilterOpts,
        implementation: &[Address],
    ) -> Result<LogIterator<Upgraded>, BindingError> {
        self.contract
            .filter_logs(opts, &IndexedFilter::topic1_addresses(implementation))
            .await
    }

    pub async fn watch_upgraded(
        &self,
        opts: &WatchOpts,
        sink: Sender<DecodedLog<Upgraded>>,
        implementation: &[Address],
    ) -> Result<EventSubscription, BindingError> {
        self.contract
            .watch_logs(opts, &IndexedFilter::topic1_addresses(implementation), sink)
            .await
    }

    pub fn parse_upgraded(&self, log: &Log) -> Result<Upgraded, BindingError> {
        self.contract.unpack_log(log)
    }
}
