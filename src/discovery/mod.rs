use crate::config::{ChainRegistry, PoolDeployment};
use crate::error::QuoteError;
use crate::types::{FeeTier, PoolCandidate, ReferenceAsset};
use alloy::primitives::{keccak256, Address, U256};

/// Deterministic pool address for a token pair and fee tier.
pub trait PoolAddressDeriver: Send + Sync {
    fn pool_address(&self, token_a: Address, token_b: Address, tier: FeeTier) -> Address;
}

impl PoolAddressDeriver for PoolDeployment {
    /// CREATE2 address: salt is keccak256(abi.encode(token0, token1, fee)) with
    /// the pair sorted ascending.
    fn pool_address(&self, token_a: Address, token_b: Address, tier: FeeTier) -> Address {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let mut encoded = [0u8; 96];
        encoded[..32].copy_from_slice(token0.into_word().as_slice());
        encoded[32..64].copy_from_slice(token1.into_word().as_slice());
        encoded[64..].copy_from_slice(&U256::from(tier.fee()).to_be_bytes::<32>());
        let salt = keccak256(encoded);

        self.factory.create2(&salt.0, &self.init_code_hash.0)
    }
}

/// One candidate per fee tier, in [`FeeTier::ALL`] order.
pub fn enumerate_pools(
    deriver: &dyn PoolAddressDeriver,
    reference: &ReferenceAsset,
    token: Address,
) -> Vec<PoolCandidate> {
    FeeTier::ALL
        .iter()
        .map(|tier| PoolCandidate {
            address: deriver.pool_address(reference.address, token, *tier),
            tier: *tier,
        })
        .collect()
}

/// Resolve the chain's reference asset and enumerate the candidate pools for `token`.
pub fn get_pool_addresses(
    registry: &ChainRegistry,
    chain_id: u64,
    token: Address,
) -> Result<(ReferenceAsset, Vec<PoolCandidate>), QuoteError> {
    let reference = registry
        .reference_asset(chain_id)
        .cloned()
        .ok_or(QuoteError::NoReferenceAsset { chain_id })?;
    let deployment = registry.deployment(chain_id);
    let candidates = enumerate_pools(&deployment, &reference, token);
    Ok((reference, candidates))
}
