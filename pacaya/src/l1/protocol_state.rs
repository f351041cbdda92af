use bindings::pacaya::taiko_inbox::{BatchTransition, Stats1, Stats2};
use std::fmt;

/// Snapshot of the inbox progress counters.
#[derive(Clone, Debug)]
pub struct ProtocolState {
    pub stats1: Stats1,
    pub stats2: Stats2,
    pub last_verified: BatchTransition,
    pub last_synced: BatchTransition,
}

impl ProtocolState {
    /// Id of the newest proposed batch. Batch 0 is the genesis batch.
    pub fn last_proposed_batch_id(&self) -> u64 {
        self.stats2.numBatches.saturating_sub(1)
    }

    pub fn unverified_batches(&self) -> u64 {
        self.last_proposed_batch_id()
            .saturating_sub(self.stats2.lastVerifiedBatchId)
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "genesis height: {}", self.stats1.genesisHeight)?;
        writeln!(
            f,
            "batches: {} proposed, last verified {}, {} unverified",
            self.stats2.numBatches,
            self.stats2.lastVerifiedBatchId,
            self.unverified_batches()
        )?;
        writeln!(
            f,
            "last verified: batch {} block {} hash {}",
            self.last_verified.batch_id, self.last_verified.block_id, self.last_verified.ts.blockHash
        )?;
        writeln!(
            f,
            "last synced: batch {} block {} at {}",
            self.last_synced.batch_id, self.last_synced.block_id, self.stats1.lastSyncedAt
        )?;
        write!(
            f,
            "propose with proof mode: {}, last proposed in L1 block {}",
            self.stats2.proposeWithProofMode, self.stats2.lastProposedIn
        )
    }
}
