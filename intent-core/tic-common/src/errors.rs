use thiserror::Error;

/// Failures a transfer pipeline reports to its caller.
///
/// Nothing is retried automatically. Only `RpcUnavailable` may be retried and
/// a retry has to start from a fresh sequence/seqno read.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TransferError {
    #[error("invalid_recipient_chain")]
    InvalidRecipientChain,
    #[error("channel_not_found")]
    ChannelNotFound,
    #[error("unsupported_asset")]
    UnsupportedAsset,
    #[error("simulation_failed: {0}")]
    SimulationFailed(String),
    #[error("rpc_unavailable: {0}")]
    RpcUnavailable(String),
    #[error("stale_sequence_number")]
    StaleSequenceNumber,
    #[error("invalid_amount")]
    InvalidAmount,
    #[error("invalid_address")]
    InvalidAddress,
    #[error("unknown_chain")]
    UnknownChain,
    #[error("superseded")]
    Superseded,
    #[error("invalid_policy: {0}")]
    InvalidPolicy(String),
}

impl TransferError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransferError::RpcUnavailable(_))
    }
}

/// Recovers the typed error from an `anyhow::Error` raised by the pipelines.
pub fn transfer_error(err: &anyhow::Error) -> Option<&TransferError> {
    err.downcast_ref::<TransferError>()
}
