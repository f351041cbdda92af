//! Conversions between the per-contract copies of the protocol structs.
//!
//! Each `sol!` invocation generates its own `ITaikoInbox`, `LibSharedData`
//! and `IVerifier` modules, so a Solidity struct shared by several contracts
//! exists once per client module. The [`taiko_inbox`] types are canonical:
//! clients that take one of these structs accept anything convertible into
//! their own copy, and the wrapper returns inbox types.
//!
//! The proposer wrapper declares `BaseFeeConfig.maxGasIssuancePerBlock` as
//! `uint64` where the inbox uses `uint32`, so converting the wrapper's structs
//! back into inbox structs can fail.

use super::{
    compose_verifier, surge_proposer_wrapper as wrapper, surge_verifier, taiko_anchor, taiko_inbox,
};
use crate::error::BindingError;

macro_rules! convert_struct {
    ($from:ty => $to:ty { $($field:ident),+ $(,)? }) => {
        impl From<$from> for $to {
            fn from(value: $from) -> Self {
                Self {
                    $($field: value.$field.into()),+
                }
            }
        }
    };
    ($a:ty, $b:ty { $($field:ident),+ $(,)? }) => {
        convert_struct!($a => $b { $($field),+ });
        convert_struct!($b => $a { $($field),+ });
    };
}

convert_struct!(taiko_inbox::BaseFeeConfig, taiko_anchor::BaseFeeConfig {
    adjustmentQuotient,
    sharingPctg,
    gasIssuancePerSecond,
    minGasExcess,
    maxGasIssuancePerBlock,
});

convert_struct!(taiko_inbox::BaseFeeConfig => wrapper::LibSharedData::BaseFeeConfig {
    adjustmentQuotient,
    sharingPctg,
    gasIssuancePerSecond,
    minGasExcess,
    maxGasIssuancePerBlock,
});

impl TryFrom<wrapper::LibSharedData::BaseFeeConfig> for taiko_inbox::BaseFeeConfig {
    type Error = BindingError;

    fn try_from(value: wrapper::LibSharedData::BaseFeeConfig) -> Result<Self, Self::Error> {
        let max_gas_issuance = value.maxGasIssuancePerBlock;
        Ok(Self {
            adjustmentQuotient: value.adjustmentQuotient,
            sharingPctg: value.sharingPctg,
            gasIssuancePerSecond: value.gasIssuancePerSecond,
            minGasExcess: value.minGasExcess,
            maxGasIssuancePerBlock: u32::try_from(max_gas_issuance).map_err(|_| {
                BindingError::OutOfRange {
                    field: "maxGasIssuancePerBlock",
                    value: max_gas_issuance,
                }
            })?,
        })
    }
}

convert_struct!(taiko_inbox::BlockParams, wrapper::ITaikoInbox::BlockParams {
    numTransactions,
    timeShift,
    signalSlots,
});

convert_struct!(taiko_inbox::BatchMetadata, wrapper::ITaikoInbox::BatchMetadata {
    infoHash,
    proposer,
    batchId,
    proposedAt,
});

impl From<taiko_inbox::BatchInfo> for wrapper::ITaikoInbox::BatchInfo {
    fn from(value: taiko_inbox::BatchInfo) -> Self {
        Self {
            txsHash: value.txsHash,
            blocks: value.blocks.into_iter().map(Into::into).collect(),
            blobHashes: value.blobHashes,
            extraData: value.extraData,
            coinbase: value.coinbase,
            proposedIn: value.proposedIn,
            blobCreatedIn: value.blobCreatedIn,
            blobByteOffset: value.blobByteOffset,
            blobByteSize: value.blobByteSize,
            gasLimit: value.gasLimit,
            baseFee: value.baseFee,
            lastBlockId: value.lastBlockId,
            lastBlockTimestamp: value.lastBlockTimestamp,
            anchorBlockId: value.anchorBlockId,
            anchorBlockHash: value.anchorBlockHash,
            baseFeeConfig: value.baseFeeConfig.into(),
        }
    }
}

impl TryFrom<wrapper::ITaikoInbox::BatchInfo> for taiko_inbox::BatchInfo {
    type Error = BindingError;

    fn try_from(value: wrapper::ITaikoInbox::BatchInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            txsHash: value.txsHash,
            blocks: value.blocks.into_iter().map(Into::into).collect(),
            blobHashes: value.blobHashes,
            extraData: value.extraData,
            coinbase: value.coinbase,
            proposedIn: value.proposedIn,
            blobCreatedIn: value.blobCreatedIn,
            blobByteOffset: value.blobByteOffset,
            blobByteSize: value.blobByteSize,
            gasLimit: value.gasLimit,
            baseFee: value.baseFee,
            lastBlockId: value.lastBlockId,
            lastBlockTimestamp: value.lastBlockTimestamp,
            anchorBlockId: value.anchorBlockId,
            anchorBlockHash: value.anchorBlockHash,
            baseFeeConfig: value.baseFeeConfig.try_into()?,
        })
    }
}

convert_struct!(taiko_inbox::Transition, compose_verifier::ITaikoInbox::Transition {
    parentHash,
    blockHash,
    stateRoot,
});

convert_struct!(taiko_inbox::Transition, surge_verifier::ITaikoInbox::Transition {
    parentHash,
    blockHash,
    stateRoot,
});

convert_struct!(compose_verifier::ITaikoInbox::Transition, surge_verifier::ITaikoInbox::Transition {
    parentHash,
    blockHash,
    stateRoot,
});

convert_struct!(compose_verifier::IVerifier::Context, surge_verifier::IVerifier::Context {
    batchId,
    metaHash,
    transition,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacaya::taiko_inbox::tests::sample_config;
    use alloy::primitives::{B256, address, aliases::U96};

    fn inbox_info() -> taiko_inbox::BatchInfo {
        taiko_inbox::BatchInfo {
            txsHash: B256::repeat_byte(0x01),
            blocks: vec![taiko_inbox::BlockParams {
                numTransactions: 7,
                timeShift: 2,
                signalSlots: vec![B256::repeat_byte(0x05)],
            }],
            blobHashes: vec![B256::repeat_byte(0x02)],
            extraData: B256::ZERO,
            coinbase: address!("0x0000000000000000000000000000000000000c01"),
            proposedIn: 100,
            blobCreatedIn: 100,
            blobByteOffset: 0,
            blobByteSize: 1024,
            gasLimit: 240_000_000,
            baseFee: U96::from(10_000_000u64),
            lastBlockId: 42,
            lastBlockTimestamp: 1_700_000_000,
            anchorBlockId: 99,
            anchorBlockHash: B256::repeat_byte(0x03),
            baseFeeConfig: sample_config().baseFeeConfig,
        }
    }

    #[test]
    fn test_inbox_base_fee_config_feeds_anchor() {
        let inbox = sample_config().baseFeeConfig;
        let anchor: taiko_anchor::BaseFeeConfig = inbox.clone().into();
        assert_eq!(anchor.adjustmentQuotient, inbox.adjustmentQuotient);
        assert_eq!(anchor.maxGasIssuancePerBlock, inbox.maxGasIssuancePerBlock);

        let back: taiko_inbox::BaseFeeConfig = anchor.into();
        assert_eq!(back, inbox);
    }

    #[test]
    fn test_wrapper_batch_info_converts_to_inbox() {
        let info = inbox_info();
        let wrapped: wrapper::ITaikoInbox::BatchInfo = info.clone().into();
        assert_eq!(
            wrapped.baseFeeConfig.maxGasIssuancePerBlock,
            u64::from(info.baseFeeConfig.maxGasIssuancePerBlock)
        );
        assert_eq!(wrapped.blocks[0].signalSlots, info.blocks[0].signalSlots);

        let back = taiko_inbox::BatchInfo::try_from(wrapped).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_wrapper_base_fee_config_too_wide_for_inbox() {
        let mut wrapped: wrapper::ITaikoInbox::BatchInfo = inbox_info().into();
        wrapped.baseFeeConfig.maxGasIssuancePerBlock = u64::from(u32::MAX) + 1;

        let err = taiko_inbox::BatchInfo::try_from(wrapped).unwrap_err();
        assert!(matches!(
            err,
            BindingError::OutOfRange {
                field: "maxGasIssuancePerBlock",
                value: 4_294_967_296,
            }
        ));
    }

    #[test]
    fn test_verifier_contexts_share_inbox_transition() {
        let transition = taiko_inbox::Transition {
            parentHash: B256::repeat_byte(0x0a),
            blockHash: B256::repeat_byte(0x0b),
            stateRoot: B256::repeat_byte(0x0c),
        };
        let compose = compose_verifier::IVerifier::Context {
            batchId: 3,
            metaHash: B256::repeat_byte(0x0d),
            transition: transition.clone().into(),
        };

        let surge: surge_verifier::IVerifier::Context = compose.into();
        assert_eq!(surge.batchId, 3);
        assert_eq!(taiko_inbox::Transition::from(surge.transition), transition);
    }
}
