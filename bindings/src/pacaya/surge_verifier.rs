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
use std::fmt;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    SurgeVerifier,
    "src/pacaya/abi/SurgeVerifier.json"
);

pub const ABI: &str = include_str!("abi/SurgeVerifier.json");

pub fn abi() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(ABI)
}

/// A sub-verifier slot of the Surge verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InternalVerifier {
    /// Whether the owner has marked this slot as replaceable.
    pub upgradeable: bool,
    pub addr: Address,
}

/// Proof type bit flags, as reported by `verifyProof` and used to address a
/// verifier slot in `markUpgradeable`/`upgradeVerifier`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofType(pub u16);

impl ProofType {
    pub const EMPTY: Self = Self(0);
    pub const SGX_RETH: Self = Self(1);
    pub const RISC0_RETH: Self = Self(1 << 1);
    pub const SP1_RETH: Self = Self(1 << 2);
    pub const SGX_GETH: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_zk(self) -> bool {
        self.contains(Self::RISC0_RETH) || self.contains(Self::SP1_RETH)
    }

    pub fn is_tee(self) -> bool {
        self.contains(Self::SGX_RETH) || self.contains(Self::SGX_GETH)
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::SGX_RETH, "sgx_reth"),
            (Self::RISC0_RETH, "risc0_reth"),
            (Self::SP1_RETH, "sp1_reth"),
            (Self::SGX_GETH, "sgx_geth"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        if names.is_empty() {
            write!(f, "empty")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// Surge verifier: dispatches proofs to its TEE and ZK sub-verifiers and
/// allows individual sub-verifiers to be upgraded.
#[derive(Clone, Debug)]
pub struct SurgeVerifierClient<P> {
    contract: BoundContract<P>,
}

impl<P: Provider + Clone + 'static> SurgeVerifierClient<P> {
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

    pub fn instance(&self) -> SurgeVerifier::SurgeVerifierInstance<P> {
        SurgeVerifier::new(self.contract.address(), self.contract.provider().clone())
    }

    pub fn essential(&self) -> EssentialContractClient<P> {
        EssentialContractClient::from_bound(self.contract.clone())
    }

    pub async fn risc0_reth_verifier(&self) -> Result<InternalVerifier, BindingError> {
        let ret = self
            .contract
            .call(&SurgeVerifier::risc0RethVerifierCall {})
            .await?;
        Ok(InternalVerifier {
            upgradeable: ret.upgradeable,
            addr: ret.addr,
        })
    }

    pub async fn sgx_geth_verifier(&self) -> Result<InternalVerifier, BindingError> {
        let ret = self
            .contract
            .call(&SurgeVerifier::sgxGethVerifierCall {})
            .await?;
        Ok(InternalVerifier {
            upgradeable: ret.upgradeable,
            addr: ret.addr,
        })
    }

    pub async fn sgx_reth_verifier(&self) -> Result<InternalVerifier, BindingError> {
        let ret = self
            .contract
            .call(&SurgeVerifier::sgxRethVerifierCall {})
            .await?;
        Ok(InternalVerifier {
            upgradeable: ret.upgradeable,
            addr: ret.addr,
        })
    }

    pub async fn sp1_reth_verifier(&self) -> Result<InternalVerifier, BindingError> {
        let ret = self
            .contract
            .call(&SurgeVerifier::sp1RethVerifierCall {})
            .await?;
        Ok(InternalVerifier {
            upgradeable: ret.upgradeable,
            addr: ret.addr,
        })
    }

    pub async fn taiko_inbox(&self) -> Result<Address, BindingError> {
        self.contract.call(&SurgeVerifier::taikoInboxCall {}).await
    }

    /// Dry-runs `verifyProof` and returns the proof types that accepted it.
    pub async fn check_proof(
        &self,
        ctxs: Vec<impl Into<IVerifier::Context>>,
        proof: Bytes,
    ) -> Result<ProofType, BindingError> {
        let proof_type = self
            .contract
            .call(&SurgeVerifier::verifyProofCall {
                _ctxs: ctxs.into_iter().map(Into::into).collect(),
                _proof: proof,
            })
            .await?;
        Ok(ProofType(proof_type.into()))
    }

    pub async fn init(
        &self,
        owner: Address,
        sgx_reth_verifier: Address,
        risc0_reth_verifier: Address,
        sp1_reth_verifier: Address,
        sgx_geth_verifier: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeVerifier::initCall {
                _owner: owner,
                _sgxRethVerifier: sgx_reth_verifier,
                _risc0RethVerifier: risc0_reth_verifier,
                _sp1RethVerifier: sp1_reth_verifier,
                _sgxGethVerifier: sgx_geth_verifier,
            })
            .await
    }

    pub async fn mark_upgradeable(
        &self,
        proof_type: ProofType,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeVerifier::markUpgradeableCall {
                _proofType: proof_type.0.into(),
            })
            .await
    }

    pub async fn upgrade_verifier(
        &self,
        proof_type: ProofType,
        new_verifier: Address,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeVerifier::upgradeVerifierCall {
                _proofType: proof_type.0.into(),
                _newVerifier: new_verifier,
            })
            .await
    }

    pub async fn verify_proof(
        &self,
        ctxs: Vec<impl Into<IVerifier::Context>>,
        proof: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.contract
            .transact(&SurgeVerifier::verifyProofCall {
                _ctxs: ctxs.into_iter().map(Into::into).collect(),
                _proof: proof,
            })
            .await
    }
}
