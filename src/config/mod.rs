use crate::types::{ReferenceAsset, REFERENCE_DECIMALS};
use alloy::primitives::{address, b256, Address, B256};
use eyre::Result;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Canonical Uniswap V3 factory, shared by the major deployments.
pub const UNISWAP_V3_FACTORY: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

/// keccak256 of the Uniswap V3 pool creation code.
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// Factory and init-code hash used to derive pool addresses on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolDeployment {
    pub factory: Address,
    pub init_code_hash: B256,
}

impl Default for PoolDeployment {
    fn default() -> Self {
        Self {
            factory: UNISWAP_V3_FACTORY,
            init_code_hash: POOL_INIT_CODE_HASH,
        }
    }
}

/// Read-only lookup of reference assets and pool deployments by chain id.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    reference_assets: HashMap<u64, ReferenceAsset>,
    deployments: HashMap<u64, PoolDeployment>,
}

/// Wrapped ether deployments, keyed by chain id.
const WETH9: &[(u64, Address)] = &[
    (1, address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
    (3, address!("c778417E063141139Fce010982780140Aa0cD5Ab")),
    (4, address!("c778417E063141139Fce010982780140Aa0cD5Ab")),
    (5, address!("B4FBF271143F4FBf7B91A5ded31805e42b2208d6")),
    (42, address!("d0A1E359811322d97991E03f863a0C30C2cF029C")),
    (11155111, address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")),
    (10, address!("4200000000000000000000000000000000000006")),
    (69, address!("4200000000000000000000000000000000000006")),
    (42161, address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1")),
    (421611, address!("B47e6A5f8b33b3F17603C83a0535A9dcD7E32681")),
    (421613, address!("e39Ab88f8A4777030A534146A9Ca3B52bd5D43A3")),
    (421614, address!("980B62Da83eFf3D4576C647993b0c1D7faf17c73")),
    (420, address!("4200000000000000000000000000000000000006")),
    (11155420, address!("4200000000000000000000000000000000000006")),
    (84531, address!("4200000000000000000000000000000000000006")),
    (84532, address!("4200000000000000000000000000000000000006")),
    (7777777, address!("4200000000000000000000000000000000000006")),
    (130, address!("4200000000000000000000000000000000000006")),
    (1301, address!("4200000000000000000000000000000000000006")),
    (480, address!("4200000000000000000000000000000000000006")),
    (81457, address!("4300000000000000000000000000000000000004")),
    (8453, address!("4200000000000000000000000000000000000006")),
    (56, address!("2170Ed0880ac9A755fd29B2688956BD959F933F8")),
    (137, address!("7ceB23fD6bC0adD59E62ac25578270cFf1b9f619")),
    (43114, address!("49D5c2BdFfac6CE2BFdB6640F4F80f226bc10bAB")),
];

static DEFAULT_REGISTRY: LazyLock<ChainRegistry> = LazyLock::new(ChainRegistry::builtin);

impl ChainRegistry {
    /// Built-in registry: WETH on every supported chain, canonical factory everywhere.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (chain_id, weth) in WETH9 {
            registry.reference_assets.insert(
                *chain_id,
                ReferenceAsset {
                    address: *weth,
                    symbol: "WETH".to_string(),
                    decimals: REFERENCE_DECIMALS,
                },
            );
        }
        registry
    }

    /// Shared instance of [`ChainRegistry::builtin`].
    pub fn global() -> &'static ChainRegistry {
        &DEFAULT_REGISTRY
    }

    pub fn reference_asset(&self, chain_id: u64) -> Option<&ReferenceAsset> {
        self.reference_assets.get(&chain_id)
    }

    /// Deployment for `chain_id`, falling back to the canonical factory.
    pub fn deployment(&self, chain_id: u64) -> PoolDeployment {
        self.deployments.get(&chain_id).copied().unwrap_or_default()
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.reference_assets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn with_reference_asset(mut self, chain_id: u64, asset: ReferenceAsset) -> Self {
        self.reference_assets.insert(chain_id, asset);
        self
    }
}

/// Format of each chain entry in chains.json (camelCase).
#[derive(serde::Deserialize)]
struct ChainEntry {
    #[serde(rename = "referenceAsset")]
    reference_asset: Option<Address>,
    symbol: Option<String>,
    factory: Option<Address>,
    #[serde(rename = "initCodeHash")]
    init_code_hash: Option<B256>,
}

/// Root format of chains.json: { "chains": { "<chainId>": {...} } }
#[derive(serde::Deserialize)]
struct ChainsFile {
    chains: HashMap<String, ChainEntry>,
}

/// Load chains.json and merge it over the built-in registry.
/// A missing file yields the built-in registry; a malformed one is an error.
pub fn load_chains_file(path: &str) -> Result<ChainRegistry> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Ok(ChainRegistry::builtin()),
    };
    parse_chains(&content, ChainRegistry::builtin())
}

fn parse_chains(content: &str, mut registry: ChainRegistry) -> Result<ChainRegistry> {
    let file: ChainsFile = serde_json::from_str(content)?;

    for (id, entry) in file.chains {
        let chain_id: u64 = id
            .parse()
            .map_err(|_| eyre::eyre!("chain id {:?} is not a number", id))?;

        if let Some(address) = entry.reference_asset {
            registry.reference_assets.insert(
                chain_id,
                ReferenceAsset {
                    address,
                    symbol: entry.symbol.unwrap_or_else(|| "WETH".to_string()),
                    decimals: REFERENCE_DECIMALS,
                },
            );
        } else if let Some(symbol) = entry.symbol {
            match registry.reference_assets.get_mut(&chain_id) {
                Some(asset) => asset.symbol = symbol,
                None => tracing::warn!("chain {} has a symbol but no reference asset; ignored", chain_id),
            }
        }

        if entry.factory.is_some() || entry.init_code_hash.is_some() {
            let base = registry.deployment(chain_id);
            registry.deployments.insert(
                chain_id,
                PoolDeployment {
                    factory: entry.factory.unwrap_or(base.factory),
                    init_code_hash: entry.init_code_hash.unwrap_or(base.init_code_hash),
                },
            );
        }
    }

    Ok(registry)
}

/// Path from `env_key`, or `default` relative to the current directory.
pub fn config_path(env_key: &str, default: &str) -> PathBuf {
    std::env::var(env_key).map(PathBuf::from).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|dir| dir.join(default))
            .unwrap_or_else(|_| PathBuf::from(default))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_has_mainnet_weth() {
        let registry = ChainRegistry::builtin();
        let weth = registry.reference_asset(1).unwrap();

        assert_eq!(weth.address, address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert_eq!(weth.decimals, 18);
        assert!(registry.reference_asset(999_999).is_none());
        assert_eq!(registry.deployment(1), PoolDeployment::default());
    }

    #[test]
    fn test_builtin_registry_covers_l2s_and_testnets() {
        let registry = ChainRegistry::builtin();
        let predeploy = address!("4200000000000000000000000000000000000006");

        for chain_id in [10, 420, 8453, 84531, 84532, 11155420, 7777777, 130, 1301, 480] {
            assert_eq!(registry.reference_asset(chain_id).unwrap().address, predeploy, "chain {}", chain_id);
        }
        assert_eq!(
            registry.reference_asset(421614).unwrap().address,
            address!("980B62Da83eFf3D4576C647993b0c1D7faf17c73")
        );
        assert_eq!(
            registry.reference_asset(11155111).unwrap().address,
            address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")
        );
        assert_eq!(
            registry.reference_asset(81457).unwrap().address,
            address!("4300000000000000000000000000000000000004")
        );
    }

    #[test]
    fn test_chains_file_overrides_merge_over_builtin() {
        let json = r#"{
            "chains": {
                "999": { "referenceAsset": "0x1111111111111111111111111111111111111111", "symbol": "WNAT" },
                "10": { "factory": "0x2222222222222222222222222222222222222222" }
            }
        }"#;

        let registry = parse_chains(json, ChainRegistry::builtin()).unwrap();

        let custom = registry.reference_asset(999).unwrap();
        assert_eq!(custom.symbol, "WNAT");
        assert_eq!(custom.address, Address::repeat_byte(0x11));
        assert_eq!(registry.deployment(10).factory, Address::repeat_byte(0x22));
        assert_eq!(registry.deployment(10).init_code_hash, POOL_INIT_CODE_HASH);
        assert!(registry.reference_asset(1).is_some());
    }

    #[test]
    fn test_chains_file_rejects_non_numeric_chain_id() {
        let json = r#"{ "chains": { "mainnet": {} } }"#;
        assert!(parse_chains(json, ChainRegistry::builtin()).is_err());
    }

    #[test]
    fn test_missing_chains_file_falls_back_to_builtin() {
        let registry = load_chains_file("/nonexistent/chains.json").unwrap();
        assert_eq!(registry.chain_ids(), ChainRegistry::builtin().chain_ids());
    }
}
