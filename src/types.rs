use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places assumed for every reference asset when rescaling prices.
pub const REFERENCE_DECIMALS: u8 = 18;

/// Token to be priced, as supplied by the host application.
///
/// Fields stay loosely typed (strings) so that incomplete input can be
/// rejected with a proper error instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    pub address: String,
    pub decimals: String,
    pub chain_id: u64,
}

impl TokenDescriptor {
    pub fn new(address: impl Into<String>, decimals: impl Into<String>, chain_id: u64) -> Self {
        Self {
            address: address.into(),
            decimals: decimals.into(),
            chain_id,
        }
    }
}

/// A [`TokenDescriptor`] that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub chain_id: u64,
}

/// Wrapped native asset of a chain, the pricing anchor for every token on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceAsset {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FeeTier {
    #[serde(rename = "0.01%")]
    Lowest,
    #[serde(rename = "0.05%")]
    Low,
    #[serde(rename = "0.3%")]
    Medium,
    #[serde(rename = "1%")]
    High,
}

impl FeeTier {
    /// Enumeration order. Earlier tiers win liquidity ties.
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Pool fee in hundredths of a basis point, as stored on-chain.
    pub fn fee(&self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10_000,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeeTier::Lowest => "0.01%",
            FeeTier::Low => "0.05%",
            FeeTier::Medium => "0.3%",
            FeeTier::High => "1%",
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A derived pool address for one fee tier, before any chain read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCandidate {
    pub address: Address,
    pub tier: FeeTier,
}

/// Decoded output of `slot0()`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub observation_index: u16,
    pub observation_cardinality: u16,
    pub observation_cardinality_next: u16,
    pub fee_protocol: u8,
    pub unlocked: bool,
}

/// A candidate whose reads all succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub candidate: PoolCandidate,
    pub slot0: Slot0,
    pub liquidity: u128,
    pub token0_is_reference: bool,
}

impl PoolState {
    pub fn sqrt_price_x96(&self) -> U256 {
        self.slot0.sqrt_price_x96
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// Winning pool.
    pub address: Address,
    /// Fee tier label of the winning pool, e.g. `"0.3%"`.
    pub fee: String,
    /// USD per whole token.
    pub price: f64,
    pub pool_contract: Address,
    pub liquidity: u128,
    pub quoted_at: DateTime<Utc>,
}
