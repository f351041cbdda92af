use alloy::{providers::Provider, rpc::types::Log};
use anyhow::Error;
use bindings::{
    DecodedLog, FilterOpts, WatchOpts,
    pacaya::{
        TaikoInboxClient,
        taiko_inbox::{BatchProposed, BatchesProved, BatchesVerified},
    },
};
use common::utils::watchdog::Watchdog;
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const CHANNEL_SIZE: usize = 64;
const MAX_RESUBSCRIBE_FAILURES: u64 = 5;
const DEFAULT_RESUBSCRIBE_DELAY: Duration = Duration::from_secs(3);

pub trait ChainMonitorEventHandler<E>: Send + Sync + 'static {
    fn handle_event(&self, event: &DecodedLog<E>);
}

#[derive(Clone)]
pub struct LoggingHandler;

impl ChainMonitorEventHandler<BatchProposed> for LoggingHandler {
    fn handle_event(&self, event: &DecodedLog<BatchProposed>) {
        info!(
            "BatchProposed event → batchId = {}, lastBlockId = {}, proposer = {}, removed = {}",
            event.event.meta.batchId,
            event.event.info.lastBlockId,
            event.event.meta.proposer,
            event.raw.removed
        );
    }
}

impl ChainMonitorEventHandler<BatchesProved> for LoggingHandler {
    fn handle_event(&self, event: &DecodedLog<BatchesProved>) {
        info!(
            "BatchesProved event → batchIds = {:?}, verifier = {}, removed = {}",
            event.event.batchIds, event.event.verifier, event.raw.removed
        );
    }
}

impl ChainMonitorEventHandler<BatchesVerified> for LoggingHandler {
    fn handle_event(&self, event: &DecodedLog<BatchesVerified>) {
        info!(
            "BatchesVerified event → batchId = {}, blockHash = {}, removed = {}",
            event.event.batchId, event.event.blockHash, event.raw.removed
        );
    }
}

/// Position of the last event of one type handed to the handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    /// Block to replay from while nothing has been delivered yet.
    start: Option<u64>,
    /// `(block number, log index)` of the last delivered log.
    last: Option<(u64, u64)>,
}

impl Cursor {
    fn new(start: Option<u64>) -> Self {
        Self { start, last: None }
    }

    /// Replay range for a fresh subscription. Inclusive of the last delivered
    /// block, whose remaining logs may not have been seen yet.
    fn backfill_opts(&self) -> Option<FilterOpts> {
        self.last
            .map(|(block, _)| block)
            .or(self.start)
            .map(|start| FilterOpts { start, end: None })
    }

    /// Reorg removals always pass. Other logs must sit after the last delivered one.
    fn accepts(&self, log: &Log) -> bool {
        if log.removed {
            return true;
        }
        match (self.last, log.block_number, log.log_index) {
            (Some(last), Some(block), Some(index)) => (block, index) > last,
            _ => true,
        }
    }

    fn advance(&mut self, log: &Log) {
        if log.removed {
            return;
        }
        if let (Some(block), Some(index)) = (log.block_number, log.log_index) {
            self.last = Some((block, index));
        }
    }
}

fn dispatch<E: 'static>(
    cursor: &mut Cursor,
    handler: &dyn ChainMonitorEventHandler<E>,
    log: &DecodedLog<E>,
    watchdog: &mut Watchdog,
) {
    watchdog.reset();
    if !cursor.accepts(&log.raw) {
        debug!(
            "Chain monitor skipping already delivered log at block {:?} index {:?}",
            log.raw.block_number, log.raw.log_index
        );
        return;
    }
    cursor.advance(&log.raw);
    handler.handle_event(log);
}

/// Follows batch proposals, proofs and verifications on the inbox and hands
/// each decoded event to `handler`.
///
/// Each event type keeps its own resume point. A new subscription is opened
/// first, then the logs since the last delivered block are replayed with a
/// historical query, and anything delivered before is skipped. Without a
/// start block the first subscription replays from the current head. Too
/// many failed attempts in a row cancel `cancel_token`.
pub struct ChainMonitor<P, H> {
    inbox: TaikoInboxClient<P>,
    handler: Arc<H>,
    poll_interval: Option<Duration>,
    proposed: Cursor,
    proved: Cursor,
    verified: Cursor,
    cancel_token: CancellationToken,
    resubscribe_delay: Duration,
}

impl<P, H> ChainMonitor<P, H>
where
    P: Provider + Clone + 'static,
    H: ChainMonitorEventHandler<BatchProposed>
        + ChainMonitorEventHandler<BatchesProved>
        + ChainMonitorEventHandler<BatchesVerified>,
{
    pub fn new(
        inbox: TaikoInboxClient<P>,
        handler: Arc<H>,
        watch_opts: WatchOpts,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            inbox,
            handler,
            poll_interval: watch_opts.poll_interval,
            proposed: Cursor::new(watch_opts.start),
            proved: Cursor::new(watch_opts.start),
            verified: Cursor::new(watch_opts.start),
            cancel_token,
            resubscribe_delay: DEFAULT_RESUBSCRIBE_DELAY,
        }
    }

    pub fn with_resubscribe_delay(mut self, delay: Duration) -> Self {
        self.resubscribe_delay = delay;
        self
    }

    pub fn run(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.monitor_inbox().await;
        })
    }

    async fn monitor_inbox(mut self) {
        let mut watchdog = Watchdog::new(self.cancel_token.clone(), MAX_RESUBSCRIBE_FAILURES);
        loop {
            match self.watch_until_closed(&mut watchdog).await {
                Ok(()) => return,
                Err(e) => {
                    warn!("Chain monitor: {e}, resubscribing...");
                    watchdog.increment();
                }
            }
            tokio::select! {
                _ = tokio::time::sleep(self.resubscribe_delay) => {},
                _ = self.cancel_token.cancelled() => {
                    info!(
                        "Shutdown signal received after {} failed subscriptions, exiting chain monitor...",
                        watchdog.counter()
                    );
                    return;
                }
            }
        }
    }

    /// Gives cursors without a replay point the current head block.
    async fn anchor_to_head(&mut self) -> Result<(), Error> {
        if [self.proposed, self.proved, self.verified]
            .iter()
            .all(|cursor| cursor.backfill_opts().is_some())
        {
            return Ok(());
        }
        let head = self.inbox.provider().get_block_number().await?;
        for cursor in [&mut self.proposed, &mut self.proved, &mut self.verified] {
            if cursor.backfill_opts().is_none() {
                cursor.start = Some(head);
            }
        }
        debug!("Chain monitor anchored at head block {head}");
        Ok(())
    }

    async fn watch_until_closed(&mut self, watchdog: &mut Watchdog) -> Result<(), Error> {
        let (proposed_tx, mut proposed_rx) = mpsc::channel(CHANNEL_SIZE);
        let (proved_tx, mut proved_rx) = mpsc::channel(CHANNEL_SIZE);
        let (verified_tx, mut verified_rx) = mpsc::channel(CHANNEL_SIZE);

        let watch_opts = WatchOpts {
            start: None,
            poll_interval: self.poll_interval,
        };
        let _proposed = self
            .inbox
            .watch_batch_proposed(&watch_opts, proposed_tx)
            .await?;
        let _proved = self
            .inbox
            .watch_batches_proved(&watch_opts, proved_tx)
            .await?;
        let _verified = self
            .inbox
            .watch_batches_verified(&watch_opts, verified_tx)
            .await?;
        self.anchor_to_head().await?;
        info!(
            "Chain monitor watching TaikoInbox {}, replaying proposed from {:?}, proved from {:?}, verified from {:?}",
            self.inbox.address(),
            self.proposed.backfill_opts().map(|opts| opts.start),
            self.proved.backfill_opts().map(|opts| opts.start),
            self.verified.backfill_opts().map(|opts| opts.start),
        );

        if let Some(opts) = self.proposed.backfill_opts() {
            for log in self.inbox.filter_batch_proposed(&opts).await? {
                dispatch::<BatchProposed>(
                    &mut self.proposed,
                    self.handler.as_ref(),
                    &log?,
                    watchdog,
                );
            }
        }
        if let Some(opts) = self.proved.backfill_opts() {
            for log in self.inbox.filter_batches_proved(&opts).await? {
                dispatch::<BatchesProved>(
                    &mut self.proved,
                    self.handler.as_ref(),
                    &log?,
                    watchdog,
                );
            }
        }
        if let Some(opts) = self.verified.backfill_opts() {
            for log in self.inbox.filter_batches_verified(&opts).await? {
                dispatch::<BatchesVerified>(
                    &mut self.verified,
                    self.handler.as_ref(),
                    &log?,
                    watchdog,
                );
            }
        }

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!("Shutdown signal received, exiting chain monitor...");
                    return Ok(());
                }
                log = proposed_rx.recv() => {
                    let log = log.ok_or_else(|| anyhow::anyhow!("BatchProposed subscription closed"))?;
                    dispatch::<BatchProposed>(
                        &mut self.proposed,
                        self.handler.as_ref(),
                        &log,
                        watchdog,
                    );
                }
                log = proved_rx.recv() => {
                    let log = log.ok_or_else(|| anyhow::anyhow!("BatchesProved subscription closed"))?;
                    dispatch::<BatchesProved>(
                        &mut self.proved,
                        self.handler.as_ref(),
                        &log,
                        watchdog,
                    );
                }
                log = verified_rx.recv() => {
                    let log = log.ok_or_else(|| anyhow::anyhow!("BatchesVerified subscription closed"))?;
                    dispatch::<BatchesVerified>(
                        &mut self.verified,
                        self.handler.as_ref(),
                        &log,
                        watchdog,
                    );
                }
            }
        }
    }
}
