use super::taiko_inbox;
use crate::contract::{BoundContract, CallOpts, TransactOpts};
use crate::error::BindingError;
use alloy::{
    json_abi::JsonAbi,
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::{PendingTransactionBuilder, Provider},
    sol,
};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    SurgeProposerWrapper,
    "src/pacaya/abi/SurgeProposerWrapper.json"
);

pub const ABI: &str = include_str!("abi/SurgeProposerWrapper.json");

pub fn abi() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(ABI)
}

/// Access-controlled front for the inbox. Only authorized callers may
/// propose and prove through it, and bonds are managed on its behalf.
#[derive(Clone, Debug)]
pub struct SurgeProposerWrapperClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> SurgeProposerWrapperClient<P> {
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

    pub fn instance(&self) -> SurgeProposerWrapper::SurgeProposerWrapperInstance<P> {
        SurgeProposerWrapper::new(self.contract.address(), self.contract.provider().clone())
    }

    /// Runs `proposeBatch` through `eth_call` and returns the batch info and
    /// metadata the inbox would record, without submitting anything.
    ///
    /// Results are converted to the inbox's structs. This fails with
    /// [`BindingError::OutOfRange`] if the returned `maxGasIssuancePerBlock`
    /// does not fit the inbox's `uint32`.
    pub async fn simulate_propose_batch(
        &self,
        params: Bytes,
        tx_list: Bytes,
    ) -> Result<(taiko_inbox::BatchInfo, taiko_inbox::BatchMetadata), BindingError> {
        let ret = self
            .contract
            .call(&SurgeProposerWrapper::proposeBatchCall {
                _params: params,
                _txList: tx_list,
            })
            .await?;
        Ok((ret._0.try_into()?, ret._1.into()))
    }

    pub async fn authorize_caller(
        &self,
        caller: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::authorizeCallerCall { caller })
            .await
    }

    pub async fn deauthorize_caller(
        &self,
        caller: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::deauthorizeCallerCall { caller })
            .await
    }

    /// Deposits `amount` of bond. For ether bonds attach the same amount as
    /// [`TransactOpts::value`].
    pub async fn deposit_bond(
        &self,
        amount: U256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::depositBondCall { _amount: amount })
            .await
    }

    pub async fn propose_batch(
        &self,
        params: Bytes,
        tx_list: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::proposeBatchCall {
                _params: params,
                _txList: tx_list,
            })
            .await
    }

    pub async fn prove_batches(
        &self,
        params: Bytes,
        proof: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::proveBatchesCall {
                _params: params,
                _proof: proof,
            })
            .await
    }

    pub async fn set_admin(
        &self,
        new_admin: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::setAdminCall { newAdmin: new_admin })
            .await
    }

    pub async fn withdraw_bond(
        &self,
        amount: U256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeProposerWrapper::withdrawBondCall { _amount: amount })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{MockRpc, abi_selectors, call_input, encode_results, mocked_provider};
    use alloy::{
        primitives::{B256, address, aliases::U96},
        sol_types::{SolCall, SolError, SolInterface},
    };
    use serde_json::json;

    fn wrapper_address() -> Address {
        address!("0x00000000000000000000000000000000000000f3")
    }

    fn sample_info() -> ITaikoInbox::BatchInfo {
        ITaikoInbox::BatchInfo {
            txsHash: B256::repeat_byte(0x01),
            blocks: vec![ITaikoInbox::BlockParams {
                numTransactions: 3,
                timeShift: 0,
                signalSlots: vec![],
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
            baseFeeConfig: LibSharedData::BaseFeeConfig {
                adjustmentQuotient: 8,
                sharingPctg: 50,
                gasIssuancePerSecond: 5_000_000,
                minGasExcess: 1_340_000_000,
                maxGasIssuancePerBlock: 600_000_000,
            },
        }
    }

    #[test]
    fn test_abi_matches_generated_bindings() {
        let abi = abi().unwrap();
        assert_eq!(
            abi.functions().count(),
            SurgeProposerWrapper::SurgeProposerWrapperCalls::COUNT
        );
        assert_eq!(abi.events().count(), 0);

        let (functions, _, errors) = abi_selectors(ABI);
        for selector in SurgeProposerWrapper::SurgeProposerWrapperCalls::SELECTORS {
            assert!(functions.contains(selector));
        }
        for selector in SurgeProposerWrapper::SurgeProposerWrapperErrors::SELECTORS {
            assert!(errors.contains(selector));
        }
    }

    #[tokio::test]
    async fn test_simulate_propose_batch_decodes_both_returns() {
        let info = sample_info();
        let meta = ITaikoInbox::BatchMetadata {
            infoHash: B256::repeat_byte(0x04),
            proposer: address!("0x0000000000000000000000000000000000000c02"),
            batchId: 42,
            proposedAt: 1_700_000_012,
        };
        let response = encode_results(&(info.clone(), meta.clone()));
        let rpc = MockRpc::start(move |_, _| Ok(response.clone())).await;

        let client = SurgeProposerWrapperClient::new(wrapper_address(), mocked_provider(&rpc));
        let (got_info, got_meta) = client
            .simulate_propose_batch(Bytes::from_static(&[1, 2]), Bytes::from_static(&[3]))
            .await
            .unwrap();

        assert_eq!(got_info.lastBlockId, info.lastBlockId);
        assert_eq!(got_info.blocks.len(), 1);
        assert_eq!(got_info.baseFeeConfig.maxGasIssuancePerBlock, 600_000_000u32);
        assert_eq!(got_meta.batchId, meta.batchId);
        assert_eq!(got_meta.proposer, meta.proposer);
    }

    #[tokio::test]
    async fn test_simulate_propose_batch_rejects_oversized_issuance() {
        let mut info = sample_info();
        info.baseFeeConfig.maxGasIssuancePerBlock = u64::MAX;
        let meta = ITaikoInbox::BatchMetadata {
            infoHash: B256::ZERO,
            proposer: Address::ZERO,
            batchId: 1,
            proposedAt: 0,
        };
        let response = encode_results(&(info, meta));
        let rpc = MockRpc::start(move |_, _| Ok(response.clone())).await;

        let client = SurgeProposerWrapperClient::new(wrapper_address(), mocked_provider(&rpc));
        let err = client
            .simulate_propose_batch(Bytes::new(), Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::OutOfRange {
                field: "maxGasIssuancePerBlock",
                value: u64::MAX,
            }
        ));
    }

    #[tokio::test]
    async fn test_deposit_bond_attaches_value() {
        let rpc = MockRpc::start(|_, _| Ok(json!(B256::repeat_byte(0x33)))).await;
        let amount = U256::from(10u64).pow(U256::from(18u64));
        let client = SurgeProposerWrapperClient::new(wrapper_address(), mocked_provider(&rpc))
            .with_transact_opts(TransactOpts::default().with_value(amount));

        client.deposit_bond(amount).await.unwrap();

        let request = rpc.requests_for("eth_sendTransaction").pop().unwrap();
        let tx = &request["params"][0];
        assert_eq!(tx["value"], json!(amount));
        assert_eq!(tx["to"], json!(wrapper_address()));
        let decoded =
            SurgeProposerWrapper::depositBondCall::abi_decode(&call_input(&request["params"]))
                .unwrap();
        assert_eq!(decoded._amount, amount);
    }

    #[tokio::test]
    async fn test_unauthorized_caller_revert_is_decodable() {
        let rpc = MockRpc::start(|_, _| {
            Err(crate::test_util::revert(
                SurgeProposerWrapper::NotAuthorized {}.abi_encode(),
            ))
        })
        .await;
        let client = SurgeProposerWrapperClient::new(wrapper_address(), mocked_provider(&rpc));

        let err = client
            .propose_batch(Bytes::new(), Bytes::new())
            .await
            .unwrap_err();
        assert!(err.revert_data().is_some());
        assert!(matches!(
            err.decode_revert::<SurgeProposerWrapper::SurgeProposerWrapperErrors>(),
            Some(SurgeProposerWrapper::SurgeProposerWrapperErrors::NotAuthorized(_))
        ));
    }
}
