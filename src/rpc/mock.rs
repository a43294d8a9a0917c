//! In-memory [`ChainReader`] for tests.

use super::ChainReader;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use eyre::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves canned return data keyed by `(address, calldata)`; unknown calls revert.
#[derive(Default)]
pub struct MockReader {
    responses: HashMap<(Address, Bytes), Bytes>,
    calls: AtomicUsize,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: SolCall>(mut self, address: Address, call: &C, data: Vec<u8>) -> Self {
        self.responses
            .insert((address, call.abi_encode().into()), data.into());
        self
    }

    /// Number of reads issued so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for MockReader {
    async fn read_contract_function(
        &self,
        address: Address,
        function: &'static str,
        calldata: Bytes,
    ) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(&(address, calldata))
            .cloned()
            .ok_or_else(|| eyre::eyre!("execution reverted: {} on {:?}", function, address))
    }
}

pub fn uint_word(value: U256) -> Vec<u8> {
    value.to_be_bytes::<32>().to_vec()
}

pub fn address_word(address: Address) -> Vec<u8> {
    address.into_word().to_vec()
}

/// `slot0()` return data with cardinality 1 and an unlocked pool.
pub fn slot0_words(sqrt_price_x96: U256, tick: i32) -> Vec<u8> {
    let mut tick_word = if tick < 0 { [0xffu8; 32] } else { [0u8; 32] };
    tick_word[28..].copy_from_slice(&tick.to_be_bytes());

    let mut data = uint_word(sqrt_price_x96);
    data.extend_from_slice(&tick_word);
    data.extend(uint_word(U256::ZERO));
    data.extend(uint_word(U256::from(1u64)));
    data.extend(uint_word(U256::from(1u64)));
    data.extend(uint_word(U256::ZERO));
    data.extend(uint_word(U256::from(1u64)));
    data
}
