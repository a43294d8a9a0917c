use alloy::primitives::Address;
use thiserror::Error;

/// Failures surfaced by a quote request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no reference asset registered for chain {chain_id}")]
    NoReferenceAsset { chain_id: u64 },

    #[error("no pool found for token {token} on chain {chain_id}")]
    NoPoolFound { token: Address, chain_id: u64 },
}

/// Why a single candidate pool was dropped. Never returned from a quote.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{function} on {address} failed: {reason}")]
    Read {
        address: Address,
        function: &'static str,
        reason: String,
    },

    #[error("malformed {function} return data from {address}: {reason}")]
    Decode {
        address: Address,
        function: &'static str,
        reason: String,
    },

    #[error("pool {0} is not initialized")]
    Uninitialized(Address),
}
