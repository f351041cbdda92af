use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, B256},
    providers::Provider,
};
use anyhow::Error;
use bindings::pacaya::TaikoAnchorClient;
use common::utils::rpc::with_timeout;
use std::time::Duration;

/// L2 side of the protocol: the execution client and its anchor contract.
pub struct L2ExecutionLayer<P> {
    provider: P,
    anchor: Option<TaikoAnchorClient<P>>,
    rpc_timeout: Duration,
}

impl<P: Provider + Clone + 'static> L2ExecutionLayer<P> {
    pub fn new(provider: P, anchor_address: Option<Address>, rpc_timeout: Duration) -> Self {
        let anchor = anchor_address.map(|address| TaikoAnchorClient::new(address, provider.clone()));
        Self {
            provider,
            anchor,
            rpc_timeout,
        }
    }

    pub fn anchor(&self) -> Option<&TaikoAnchorClient<P>> {
        self.anchor.as_ref()
    }

    pub async fn get_latest_block_number(&self) -> Result<u64, Error> {
        with_timeout(
            self.rpc_timeout,
            "get L2 block number",
            self.provider.get_block_number(),
        )
        .await
    }

    pub async fn get_genesis_hash(&self) -> Result<B256, Error> {
        let block = with_timeout(
            self.rpc_timeout,
            "get L2 genesis block",
            self.provider
                .get_block_by_number(BlockNumberOrTag::Number(0))
                .into_future(),
        )
        .await?
        .ok_or_else(|| anyhow::anyhow!("L2 genesis block not found"))?;
        Ok(block.header.hash)
    }

    /// Last L1 block whose state root was synced into L2 by an anchor transaction.
    pub async fn get_last_synced_l1_block(&self) -> Result<u64, Error> {
        let anchor = self
            .anchor
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("TaikoAnchor address is not configured"))?;
        with_timeout(
            self.rpc_timeout,
            "get last synced block from TaikoAnchor",
            anchor.last_synced_block(),
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::{
        primitives::address,
        rpc::types::{Block, BlockTransactions, Header},
        sol_types::SolCall,
    };
    use bindings::{
        pacaya::taiko_anchor::TaikoAnchor,
        test_util::{MockRpc, call_input, encode_result, mocked_provider},
    };
    use serde_json::{Value, json};

    /// Serialized L2 genesis block and its hash.
    pub(crate) fn genesis_block() -> (Value, B256) {
        let header = Header::new(alloy::consensus::Header::default());
        let hash = header.hash;
        let block: Block = Block {
            header,
            uncles: vec![],
            transactions: BlockTransactions::Hashes(vec![]),
            withdrawals: None,
        };
        (serde_json::to_value(block).expect("serialize block"), hash)
    }

    #[tokio::test]
    async fn test_genesis_hash() {
        let (block, hash) = genesis_block();
        let rpc = MockRpc::start(move |method, params| {
            assert_eq!(method, "eth_getBlockByNumber");
            assert_eq!(params[0], json!("0x0"));
            Ok(block.clone())
        })
        .await;
        let l2 = L2ExecutionLayer::new(mocked_provider(&rpc), None, Duration::from_secs(5));

        assert_eq!(l2.get_genesis_hash().await.unwrap(), hash);
    }

    #[tokio::test]
    async fn test_missing_genesis_block() {
        let rpc = MockRpc::start(|_, _| Ok(Value::Null)).await;
        let l2 = L2ExecutionLayer::new(mocked_provider(&rpc), None, Duration::from_secs(5));

        let err = l2.get_genesis_hash().await.unwrap_err();
        assert_eq!(err.to_string(), "L2 genesis block not found");
    }

    #[tokio::test]
    async fn test_last_synced_l1_block_requires_anchor() {
        let rpc = MockRpc::start(|_, params| {
            assert!(call_input(params).starts_with(&TaikoAnchor::lastSyncedBlockCall::SELECTOR));
            Ok(encode_result(&4242u64))
        })
        .await;
        let without_anchor =
            L2ExecutionLayer::new(mocked_provider(&rpc), None, Duration::from_secs(5));
        assert!(without_anchor.get_last_synced_l1_block().await.is_err());

        let with_anchor = L2ExecutionLayer::new(
            mocked_provider(&rpc),
            Some(address!("0x1670000000000000000000000000000000010001")),
            Duration::from_secs(5),
        );
        assert_eq!(with_anchor.get_last_synced_l1_block().await.unwrap(), 4242);
    }
}
