//! Generic contract plumbing shared by every typed client.

mod events;
mod opts;

pub use events::{DecodedLog, EventSubscription, IndexedFilter, LogIterator};
pub use opts::{CallOpts, FilterOpts, TransactOpts, WatchOpts};

use crate::error::BindingError;
use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{Filter, Log, TransactionInput, TransactionRequest},
    sol_types::{SolCall, SolEvent},
};
use events::LogSource;
use futures_util::StreamExt;
use tokio::sync::mpsc::Sender;
use tracing::{debug, trace};

/// A contract address paired with a provider, plus the options pre-bound to
/// every call and transaction issued through it.
#[derive(Clone, Debug)]
pub struct BoundContract<P> {
    address: Address,
    provider: P,
    call_opts: CallOpts,
    transact_opts: TransactOpts,
}

impl<P: Provider + Clone + 'static> BoundContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            address,
            provider,
            call_opts: CallOpts::default(),
            transact_opts: TransactOpts::default(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn call_opts(&self) -> &CallOpts {
        &self.call_opts
    }

    pub fn transact_opts(&self) -> &TransactOpts {
        &self.transact_opts
    }

    pub fn with_call_opts(mut self, call_opts: CallOpts) -> Self {
        self.call_opts = call_opts;
        self
    }

    pub fn with_transact_opts(mut self, transact_opts: TransactOpts) -> Self {
        self.transact_opts = transact_opts;
        self
    }

    /// Executes a read-only call and decodes its return values.
    pub async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return, BindingError> {
        let mut request = TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::new(call.abi_encode().into()));
        if let Some(from) = self.call_opts.from {
            request = request.from(from);
        }

        trace!("eth_call {} on {}", C::SIGNATURE, self.address);
        let mut eth_call = self.provider.call(request);
        if let Some(block) = self.call_opts.block {
            eth_call = eth_call.block(block);
        }
        let output = eth_call.await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    /// Builds the transaction request for `call` without sending it.
    pub fn transaction_request<C: SolCall>(&self, call: &C) -> TransactionRequest {
        let opts = &self.transact_opts;
        let mut request = TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::new(call.abi_encode().into()));
        if let Some(from) = opts.from {
            request = request.from(from);
        }
        if let Some(value) = opts.value {
            request = request.value(value);
        }
        if let Some(gas_limit) = opts.gas_limit {
            request = request.gas_limit(gas_limit);
        }
        if let Some(nonce) = opts.nonce {
            request = request.nonce(nonce);
        }
        if let Some(max_fee_per_gas) = opts.max_fee_per_gas {
            request = request.max_fee_per_gas(max_fee_per_gas);
        }
        if let Some(max_priority_fee_per_gas) = opts.max_priority_fee_per_gas {
            request = request.max_priority_fee_per_gas(max_priority_fee_per_gas);
        }
        request
    }

    /// Submits a state-changing call.
    pub async fn transact<C: SolCall>(
        &self,
        call: &C,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        let request = self.transaction_request(call);
        debug!("Sending {} to {}", C::SIGNATURE, self.address);
        Ok(self.provider.send_transaction(request).await?)
    }

    fn log_filter<E: SolEvent>(&self, indexed: &IndexedFilter) -> Filter {
        let mut filter = Filter::new()
            .address(self.address)
            .event_signature(E::SIGNATURE_HASH);
        if !indexed.topic1.is_empty() {
            filter = filter.topic1(indexed.topic1.clone());
        }
        if !indexed.topic2.is_empty() {
            filter = filter.topic2(indexed.topic2.clone());
        }
        if !indexed.topic3.is_empty() {
            filter = filter.topic3(indexed.topic3.clone());
        }
        filter
    }

    /// Queries historical logs of event `E` emitted by this contract.
    pub async fn filter_logs<E: SolEvent>(
        &self,
        opts: &FilterOpts,
        indexed: &IndexedFilter,
    ) -> Result<LogIterator<E>, BindingError> {
        let mut filter = self.log_filter::<E>(indexed).from_block(opts.start);
        if let Some(end) = opts.end {
            filter = filter.to_block(end);
        }
        let logs = self.provider.get_logs(&filter).await?;
        debug!(
            "Fetched {} {} logs from block {}",
            logs.len(),
            E::SIGNATURE,
            opts.start
        );
        Ok(LogIterator::new(logs))
    }

    /// Subscribes to new logs of event `E` and forwards them, decoded, to `sink`.
    pub async fn watch_logs<E>(
        &self,
        opts: &WatchOpts,
        indexed: &IndexedFilter,
        sink: Sender<DecodedLog<E>>,
    ) -> Result<EventSubscription, BindingError>
    where
        E: SolEvent + Send + 'static,
    {
        let mut filter = self.log_filter::<E>(indexed);
        if let Some(start) = opts.start {
            filter = filter.from_block(start);
        }

        let source = match opts.poll_interval {
            Some(poll_interval) => LogSource::Filter {
                id: self.provider.new_filter(&filter).await?,
                poll_interval,
            },
            None => LogSource::Stream(
                self.provider
                    .subscribe_logs(&filter)
                    .await?
                    .into_stream()
                    .boxed(),
            ),
        };
        debug!("Watching {} on {}", E::SIGNATURE, self.address);
        Ok(EventSubscription::spawn(
            source,
            self.provider.clone(),
            sink,
        ))
    }

    /// Decodes a single log as event `E`.
    pub fn unpack_log<E: SolEvent>(&self, log: &Log) -> Result<E, BindingError> {
        Ok(E::decode_log_data(log.data())?)
    }
}
