use bindings::pacaya::taiko_inbox;
use common::fork_info::ForkHeights;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseFeeConfig {
    pub adjustment_quotient: u8,
    pub sharing_pctg: u8,
    pub gas_issuance_per_second: u32,
    pub min_gas_excess: u64,
    pub max_gas_issuance_per_block: u32,
}

impl From<&taiko_inbox::BaseFeeConfig> for BaseFeeConfig {
    fn from(config: &taiko_inbox::BaseFeeConfig) -> Self {
        Self {
            adjustment_quotient: config.adjustmentQuotient,
            sharing_pctg: config.sharingPctg,
            gas_issuance_per_second: config.gasIssuancePerSecond,
            min_gas_excess: config.minGasExcess,
            max_gas_issuance_per_block: config.maxGasIssuancePerBlock,
        }
    }
}

/// Inbox configuration in native types, as read from `pacayaConfig()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub chain_id: u64,
    pub base_fee_config: BaseFeeConfig,
    pub max_unverified_batches: u64,
    pub max_batches_to_verify: u64,
    pub max_blocks_per_batch: u16,
    pub max_anchor_height_offset: u64,
    pub block_max_gas_limit: u32,
    pub liveness_bond_base: u128,
    pub liveness_bond_per_block: u128,
    pub proving_window: u32,
    pub cooldown_window: u32,
    pub max_verification_delay: u64,
    pub fork_heights: ForkHeights,
}

impl From<&taiko_inbox::Config> for ProtocolConfig {
    fn from(config: &taiko_inbox::Config) -> Self {
        Self {
            chain_id: config.chainId,
            base_fee_config: BaseFeeConfig::from(&config.baseFeeConfig),
            max_unverified_batches: config.maxUnverifiedBatches,
            max_batches_to_verify: config.maxBatchesToVerify,
            max_blocks_per_batch: config.maxBlocksPerBatch,
            max_anchor_height_offset: config.maxAnchorHeightOffset,
            block_max_gas_limit: config.blockMaxGasLimit,
            liveness_bond_base: config.livenessBondBase.to(),
            liveness_bond_per_block: config.livenessBondPerBlock.to(),
            proving_window: config.provingWindow.to(),
            cooldown_window: config.cooldownWindow.to(),
            max_verification_delay: config.maxVerificationDelay,
            fork_heights: fork_heights(&config.forkHeights),
        }
    }
}

pub fn fork_heights(heights: &taiko_inbox::ForkHeights) -> ForkHeights {
    ForkHeights {
        ontake: heights.ontake,
        pacaya: heights.pacaya,
        shasta: heights.shasta,
        unzen: heights.unzen,
    }
}

impl fmt::Display for ProtocolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chain_id: {}, max_blocks_per_batch: {}, max_anchor_height_offset: {}, block_max_gas_limit: {}, proving_window: {}s, fork_heights: ontake={} pacaya={} shasta={} unzen={}",
            self.chain_id,
            self.max_blocks_per_batch,
            self.max_anchor_height_offset,
            self.block_max_gas_limit,
            self.proving_window,
            self.fork_heights.ontake,
            self.fork_heights.pacaya,
            self.fork_heights.shasta,
            self.fork_heights.unzen,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::aliases::{U24, U96};

    pub(crate) fn sample_inbox_config() -> taiko_inbox::Config {
        taiko_inbox::Config {
            chainId: 763374,
            maxUnverifiedBatches: 324_000,
            batchRingBufferSize: 324_512,
            maxBatchesToVerify: 16,
            blockMaxGasLimit: 240_000_000,
            livenessBondBase: U96::from(125_000_000_000_000_000_000u128),
            livenessBondPerBlock: U96::ZERO,
            stateRootSyncInternal: 4,
            maxAnchorHeightOffset: 64,
            baseFeeConfig: taiko_inbox::BaseFeeConfig {
                adjustmentQuotient: 8,
                sharingPctg: 75,
                gasIssuancePerSecond: 5_000_000,
                minGasExcess: 1_344_899_430,
                maxGasIssuancePerBlock: 600_000_000,
            },
            provingWindow: U24::from(7200u32),
            cooldownWindow: U24::from(3600u32),
            maxSignalsToReceive: 16,
            maxBlocksPerBatch: 768,
            forkHeights: taiko_inbox::ForkHeights {
                ontake: 0,
                pacaya: 0,
                shasta: 2_000_000,
                unzen: 0,
            },
            maxVerificationDelay: 3600,
        }
    }

    #[test]
    fn test_from_inbox_config() {
        let config = ProtocolConfig::from(&sample_inbox_config());
        assert_eq!(config.chain_id, 763374);
        assert_eq!(config.max_blocks_per_batch, 768);
        assert_eq!(config.proving_window, 7200);
        assert_eq!(config.cooldown_window, 3600);
        assert_eq!(config.liveness_bond_base, 125_000_000_000_000_000_000);
        assert_eq!(config.base_fee_config.sharing_pctg, 75);
        assert_eq!(config.fork_heights.shasta, 2_000_000);
        assert_eq!(config.fork_heights.unzen, 0);
    }

    #[test]
    fn test_display_lists_fork_heights() {
        let config = ProtocolConfig::from(&sample_inbox_config());
        let printed = config.to_string();
        assert!(printed.contains("chain_id: 763374"));
        assert!(printed.contains("shasta=2000000"));
    }
}
