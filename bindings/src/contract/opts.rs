use alloy::{
    eips::BlockId,
    primitives::{Address, U256},
};
use std::time::Duration;

/// Options applied to read-only contract calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// Optional sender, visible to the contract as `msg.sender`.
    pub from: Option<Address>,
    /// Block to execute the call against. Defaults to `latest`.
    pub block: Option<BlockId>,
}

impl CallOpts {
    pub fn at_block(block: impl Into<BlockId>) -> Self {
        Self {
            from: None,
            block: Some(block.into()),
        }
    }
}

/// Options applied to state-changing transactions.
///
/// Unset fields are left for the provider's fillers (or the node) to populate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactOpts {
    pub from: Option<Address>,
    /// Wei attached to the transaction, only meaningful for payable methods.
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl TransactOpts {
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }
}

/// Block range for historical log queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOpts {
    pub start: u64,
    /// Inclusive upper bound. `None` means up to the latest block.
    pub end: Option<u64>,
}

impl FilterOpts {
    pub fn range(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Options for live log subscriptions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// Sent as the filter's `fromBlock`. Nodes only report logs that arrive
    /// after the subscription is created, so older logs need a historical
    /// query.
    pub start: Option<u64>,
    /// When set, logs are fetched by polling a node-side filter at this interval
    /// instead of an `eth_subscribe` subscription. Required for HTTP providers.
    /// The filter is uninstalled when the subscription ends.
    pub poll_interval: Option<Duration>,
}
