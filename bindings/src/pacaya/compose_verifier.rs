use super::essential::EssentialContractClient;
use crate::contract::{BoundContract, CallOpts, TransactOpts};
use crate::error::BindingError;
use alloy::{
    json_abi::JsonAbi,
    network::Ethereum,
    primitives::{Address, Bytes},
    providers::{PendingTransactionBuilder, Provider},
    sol,
};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    ComposeVerifier,
    "src/pacaya/abi/ComposeVerifier.json"
);

pub const ABI: &str = include_str!("abi/ComposeVerifier.json");

pub fn abi() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(ABI)
}

/// Proof verifier that aggregates the individual TEE and ZK verifiers.
#[derive(Clone, Debug)]
pub struct ComposeVerifierClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> ComposeVerifierClient<P> {
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

    pub fn instance(&self) -> ComposeVerifier::ComposeVerifierInstance<P> {
        ComposeVerifier::new(self.contract.address(), self.contract.provider().clone())
    }

    pub fn essential(&self) -> EssentialContractClient<P> {
        EssentialContractClient::from_bound(self.contract.clone())
    }

    pub async fn op_verifier(&self) -> Result<Address, BindingError> {
        self.contract.call(&ComposeVerifier::opVerifierCall {}).await
    }

    pub async fn risc0_reth_verifier(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&ComposeVerifier::risc0RethVerifierCall {})
            .await
    }

    pub async fn sgx_geth_verifier(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&ComposeVerifier::sgxGethVerifierCall {})
            .await
    }

    pub async fn sgx_reth_verifier(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&ComposeVerifier::sgxRethVerifierCall {})
            .await
    }

    pub async fn sp1_reth_verifier(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&ComposeVerifier::sp1RethVerifierCall {})
            .await
    }

    pub async fn taiko_inbox(&self) -> Result<Address, BindingError> {
        self.contract.call(&ComposeVerifier::taikoInboxCall {}).await
    }

    pub async fn tdx_geth_verifier(&self) -> Result<Address, BindingError> {
        self.contract
            .call(&ComposeVerifier::tdxGethVerifierCall {})
            .await
    }

    /// Dry-runs `verifyProof` with `eth_call`. A rejected proof surfaces as a
    /// revert carrying one of [`ComposeVerifier::ComposeVerifierErrors`].
    pub async fn check_proof(
        &self,
        ctxs: Vec<impl Into<IVerifier::Context>>,
        proof: Bytes,
    ) -> Result<(), BindingError> {
        self.contract
            .call(&ComposeVerifier::verifyProofCall {
                _ctxs: ctxs.into_iter().map(Into::into).collect(),
                _proof: proof,
            })
            .await
            .map(|_| ())
    }

    pub async fn init(
        &self,
        owner: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&ComposeVerifier::initCall { _owner: owner })
            .await
    }

    pub async fn verify_proof(
        &self,
        ctxs: Vec<impl Into<IVerifier::Context>>,
        proof: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&ComposeVerifier::verifyProofCall {
                _ctxs: ctxs.into_iter().map(Into::into).collect(),
                _proof: proof,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{MockRpc, abi_selectors, call_input, encode_result, mocked_provider};
    use alloy::{
        primitives::{B256, address},
        sol_types::{SolCall, SolError, SolEvent, SolEventInterface, SolInterface},
    };

    fn verifier_address() -> Address {
        address!("0x00000000000000000000000000000000000000f1")
    }

    #[test]
    fn test_abi_matches_generated_bindings() {
        let abi = abi().unwrap();
        assert_eq!(abi.functions().count(), ComposeVerifier::ComposeVerifierCalls::COUNT);
        assert_eq!(abi.events().count(), ComposeVerifier::ComposeVerifierEvents::SELECTORS.len());

        let (functions, events, errors) = abi_selectors(ABI);
        for selector in ComposeVerifier::ComposeVerifierCalls::SELECTORS {
            assert!(functions.contains(selector));
        }
        for selector in ComposeVerifier::ComposeVerifierEvents::SELECTORS {
            assert!(events.contains(selector));
        }
        for selector in ComposeVerifier::ComposeVerifierErrors::SELECTORS {
            assert!(errors.contains(selector));
        }
    }

    #[tokio::test]
    async fn test_sub_verifier_getters() {
        let sgx = address!("0x0000000000000000000000000000000000000a01");
        let sp1 = address!("0x0000000000000000000000000000000000000a02");
        let rpc = MockRpc::start(move |_, params| {
            let input = call_input(params);
            if input.starts_with(&ComposeVerifier::sgxRethVerifierCall::SELECTOR) {
                Ok(encode_result(&sgx))
            } else if input.starts_with(&ComposeVerifier::sp1RethVerifierCall::SELECTOR) {
                Ok(encode_result(&sp1))
            } else {
                Ok(encode_result(&Address::ZERO))
            }
        })
        .await;

        let client = ComposeVerifierClient::new(verifier_address(), mocked_provider(&rpc));
        assert_eq!(client.sgx_reth_verifier().await.unwrap(), sgx);
        assert_eq!(client.sp1_reth_verifier().await.unwrap(), sp1);
        assert_eq!(client.tdx_geth_verifier().await.unwrap(), Address::ZERO);

        let requests = rpc.requests_for("eth_call");
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0]["params"][0]["to"],
            serde_json::json!(verifier_address())
        );
    }

    #[tokio::test]
    async fn test_call_opts_pin_block() {
        let rpc = MockRpc::start(|_, _| Ok(encode_result(&Address::ZERO))).await;
        let client = ComposeVerifierClient::new(verifier_address(), mocked_provider(&rpc))
            .with_call_opts(CallOpts::at_block(1234u64));
        client.taiko_inbox().await.unwrap();

        let request = rpc.requests().pop().unwrap();
        assert_eq!(request["params"][1], serde_json::json!("0x4d2"));
    }

    #[tokio::test]
    async fn test_check_proof_surfaces_custom_error() {
        let rpc = MockRpc::start(|_, _| {
            Err(crate::test_util::revert(
                ComposeVerifier::CV_VERIFIERS_INSUFFICIENT {}.abi_encode(),
            ))
        })
        .await;
        let client = ComposeVerifierClient::new(verifier_address(), mocked_provider(&rpc));

        let ctx = IVerifier::Context {
            batchId: 7,
            metaHash: B256::repeat_byte(0x01),
            transition: ITaikoInbox::Transition {
                parentHash: B256::repeat_byte(0x02),
                blockHash: B256::repeat_byte(0x03),
                stateRoot: B256::repeat_byte(0x04),
            },
        };
        let err = client
            .check_proof(vec![ctx.clone()], Bytes::from_static(b"proof"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.decode_revert::<ComposeVerifier::ComposeVerifierErrors>(),
            Some(ComposeVerifier::ComposeVerifierErrors::CV_VERIFIERS_INSUFFICIENT(_))
        ));

        let request = rpc.requests().pop().unwrap();
        let decoded =
            ComposeVerifier::verifyProofCall::abi_decode(&call_input(&request["params"])).unwrap();
        assert_eq!(decoded._ctxs.len(), 1);
        assert_eq!(decoded._ctxs[0].batchId, ctx.batchId);
        assert_eq!(decoded._proof, Bytes::from_static(b"proof"));
    }

    #[test]
    fn test_events_decode_through_interface_enum() {
        let log = alloy::primitives::Log {
            address: verifier_address(),
            data: ComposeVerifier::Paused {
                account: address!("0x0000000000000000000000000000000000000abc"),
            }
            .encode_log_data(),
        };
        let decoded = ComposeVerifier::ComposeVerifierEvents::decode_log(&log).unwrap();
        assert!(matches!(
            decoded.data,
            ComposeVerifier::ComposeVerifierEvents::Paused(_)
        ));
    }
}
