use alloy::{primitives::Bytes, sol_types::SolInterface, transports::TransportError};
use thiserror::Error;

/// Errors surfaced by the contract bindings.
///
/// Transport and ABI failures are forwarded untouched so callers can inspect
/// the node's response (including revert data) themselves.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),

    #[error("log subscription closed by the node")]
    SubscriptionClosed,

    #[error("log subscription task failed: {0}")]
    SubscriptionTask(String),

    #[error("{field} value {value} is out of range for the target struct")]
    OutOfRange { field: &'static str, value: u64 },
}

impl BindingError {
    /// Raw revert payload returned by the node, if the failure was a revert.
    pub fn revert_data(&self) -> Option<Bytes> {
        match self {
            Self::Transport(err) => err.as_error_resp().and_then(|resp| resp.as_revert_data()),
            _ => None,
        }
    }

    /// Decodes the revert payload into one of the contract's custom errors.
    ///
    /// ```ignore
    /// if let Some(TaikoInbox::TaikoInboxErrors::BatchNotFound(_)) =
    ///     err.decode_revert::<TaikoInbox::TaikoInboxErrors>()
    /// { ... }
    /// ```
    pub fn decode_revert<I: SolInterface>(&self) -> Option<I> {
        let data = self.revert_data()?;
        I::abi_decode(&data).ok()
    }
}
