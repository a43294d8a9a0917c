use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::eth::TransactionRequest;
use alloy::transports::BoxTransport;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(test)]
pub(crate) mod mock;

/// Read-only access to contract state.
///
/// Implementations own transport concerns (timeouts, retries, batching). Each
/// call is independent; callers may issue any number of them concurrently.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Call `function` on `address`. `function` is the Solidity signature the
    /// ABI-encoded `calldata` was built from; the raw return data is returned.
    async fn read_contract_function(
        &self,
        address: Address,
        function: &'static str,
        calldata: Bytes,
    ) -> Result<Bytes>;
}

/// [`ChainReader`] over an alloy provider, using `eth_call` at the latest block.
pub struct ProviderReader {
    provider: Arc<dyn Provider<BoxTransport>>,
}

impl ProviderReader {
    /// Connect to `rpc_url`; the transport (http, ws, ipc) follows the url scheme.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().on_builtin(rpc_url).await?;
        info!("Connected chain reader");
        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    pub async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }
}

#[async_trait]
impl ChainReader for ProviderReader {
    async fn read_contract_function(
        &self,
        address: Address,
        function: &'static str,
        calldata: Bytes,
    ) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(address).with_input(calldata);
        let output = self.provider.call(&tx).await?;
        debug!("{} on {:?} returned {} bytes", function, address, output.len());
        Ok(output)
    }
}
