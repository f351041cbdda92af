//! Clients for the contracts deployed by the Pacaya fork of the protocol.
pub mod compose_verifier;
pub mod essential;
pub mod shared;
pub mod surge_proposer_wrapper;
pub mod surge_verifier;
pub mod taiko_anchor;
pub mod taiko_inbox;

pub use compose_verifier::ComposeVerifierClient;
pub use essential::EssentialContractClient;
pub use surge_proposer_wrapper::SurgeProposerWrapperClient;
pub use surge_verifier::SurgeVerifierClient;
pub use taiko_anchor::TaikoAnchorClient;
pub use taiko_inbox::TaikoInboxClient;
