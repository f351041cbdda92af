use crate::error::BindingError;
use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::Log,
    sol_types::SolEvent,
};
use futures_util::{StreamExt, stream::BoxStream};
use std::{marker::PhantomData, time::Duration, vec::IntoIter};
use tokio::{
    sync::mpsc::Sender,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A decoded event together with the log it was decoded from.
#[derive(Clone, Debug)]
pub struct DecodedLog<E> {
    pub event: E,
    pub raw: Log,
}

impl<E> DecodedLog<E> {
    pub fn block_number(&self) -> Option<u64> {
        self.raw.block_number
    }

    pub fn transaction_hash(&self) -> Option<B256> {
        self.raw.transaction_hash
    }
}

pub(crate) fn decode_log<E: SolEvent>(log: Log) -> Result<DecodedLog<E>, BindingError> {
    let event = E::decode_log_data(log.data())?;
    Ok(DecodedLog { event, raw: log })
}

/// Values to match for the indexed arguments of an event, in declaration order.
/// An empty list matches any value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexedFilter {
    pub topic1: Vec<B256>,
    pub topic2: Vec<B256>,
    pub topic3: Vec<B256>,
}

impl IndexedFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn topic1_addresses(addresses: &[Address]) -> Self {
        Self {
            topic1: to_topics(addresses),
            ..Self::default()
        }
    }

    pub fn addresses(first: &[Address], second: &[Address]) -> Self {
        Self {
            topic1: to_topics(first),
            topic2: to_topics(second),
            topic3: vec![],
        }
    }
}

fn to_topics(addresses: &[Address]) -> Vec<B256> {
    addresses.iter().map(|address| address.into_word()).collect()
}

/// Iterator over logs returned by a historical query.
///
/// Logs are decoded lazily. The first decoding failure is yielded as an error
/// and ends the iteration.
pub struct LogIterator<E> {
    logs: IntoIter<Log>,
    failed: bool,
    _event: PhantomData<E>,
}

impl<E: SolEvent> LogIterator<E> {
    pub(crate) fn new(logs: Vec<Log>) -> Self {
        Self {
            logs: logs.into_iter(),
            failed: false,
            _event: PhantomData,
        }
    }

    /// Number of logs not yet consumed.
    pub fn remaining(&self) -> usize {
        if self.failed { 0 } else { self.logs.len() }
    }
}

impl<E: SolEvent> Iterator for LogIterator<E> {
    type Item = Result<DecodedLog<E>, BindingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let log = self.logs.next()?;
        let decoded = decode_log::<E>(log);
        if decoded.is_err() {
            self.failed = true;
        }
        Some(decoded)
    }
}

/// Where a subscription reads its logs from.
pub(crate) enum LogSource {
    /// Push subscription opened with `eth_subscribe`.
    Stream(BoxStream<'static, Log>),
    /// Node-side filter installed with `eth_newFilter`. It is polled with
    /// `eth_getFilterChanges` and uninstalled when the subscription ends.
    Filter { id: U256, poll_interval: Duration },
}

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a live log subscription that forwards decoded events into a channel.
///
/// Dropping the handle, or calling [`EventSubscription::unsubscribe`], stops the
/// forwarding task.
pub struct EventSubscription {
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<Result<(), BindingError>>>,
}

impl EventSubscription {
    pub(crate) fn spawn<E, P>(source: LogSource, provider: P, sink: Sender<DecodedLog<E>>) -> Self
    where
        E: SolEvent + Send + 'static,
        P: Provider + 'static,
    {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(forward_logs(source, provider, sink, cancel_token.clone()));
        Self {
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn unsubscribe(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Waits for the forwarding task to end and returns the reason it stopped.
    pub async fn wait(mut self) -> Result<(), BindingError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle
            .await
            .map_err(|e| BindingError::SubscriptionTask(e.to_string()))?
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn forward_logs<E, P>(
    source: LogSource,
    provider: P,
    sink: Sender<DecodedLog<E>>,
    cancel_token: CancellationToken,
) -> Result<(), BindingError>
where
    E: SolEvent + Send + 'static,
    P: Provider,
{
    match source {
        LogSource::Stream(stream) => forward_stream(stream, &sink, &cancel_token).await,
        LogSource::Filter { id, poll_interval } => {
            let result = poll_filter(&provider, id, poll_interval, &sink, &cancel_token).await;
            match provider.uninstall_filter(id).await {
                Ok(_) => debug!("Uninstalled {} filter {id}", E::SIGNATURE),
                Err(e) => warn!("Failed to uninstall {} filter {id}: {e}", E::SIGNATURE),
            }
            result
        }
    }
}

async fn forward_stream<E: SolEvent>(
    mut stream: BoxStream<'static, Log>,
    sink: &Sender<DecodedLog<E>>,
    cancel_token: &CancellationToken,
) -> Result<(), BindingError> {
    loop {
        let next = tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!("{} subscription cancelled", E::SIGNATURE);
                return Ok(());
            }
            next = stream.next() => next,
        };
        let Some(log) = next else {
            warn!("{} subscription stream ended", E::SIGNATURE);
            return Err(BindingError::SubscriptionClosed);
        };
        if !deliver(log, sink, cancel_token).await? {
            return Ok(());
        }
    }
}

async fn poll_filter<E: SolEvent, P: Provider>(
    provider: &P,
    id: U256,
    poll_interval: Duration,
    sink: &Sender<DecodedLog<E>>,
    cancel_token: &CancellationToken,
) -> Result<(), BindingError> {
    let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!("{} subscription cancelled", E::SIGNATURE);
                return Ok(());
            }
            _ = ticker.tick() => {}
        }
        let changes = tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!("{} subscription cancelled", E::SIGNATURE);
                return Ok(());
            }
            changes = provider.get_filter_changes::<Log>(id) => changes?,
        };
        for log in changes {
            if !deliver(log, sink, cancel_token).await? {
                return Ok(());
            }
        }
    }
}

/// Decodes `log` and sends it to `sink`. Returns `false` once the
/// subscription should stop.
async fn deliver<E: SolEvent>(
    log: Log,
    sink: &Sender<DecodedLog<E>>,
    cancel_token: &CancellationToken,
) -> Result<bool, BindingError> {
    if log.removed {
        debug!("{} log removed by reorg", E::SIGNATURE);
    }
    let decoded = decode_log::<E>(log)?;
    tokio::select! {
        _ = cancel_token.cancelled() => {
            debug!("{} subscription cancelled", E::SIGNATURE);
            Ok(false)
        }
        sent = sink.send(decoded) => {
            if sent.is_err() {
                debug!("{} receiver dropped, closing subscription", E::SIGNATURE);
            }
            Ok(sent.is_ok())
        }
    }
}
