use crate::config::ChainRegistry;
use crate::discovery::get_pool_addresses;
use crate::error::QuoteError;
use crate::liquidity_pools::get_best_pool_data;
use crate::pricing::calculate_adjusted_price;
use crate::rpc::ChainReader;
use crate::types::{QuoteResult, Token, TokenDescriptor};
use alloy::primitives::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Check a descriptor before any chain access.
pub fn validate_token(token: &TokenDescriptor) -> Result<Token, QuoteError> {
    let address = token.address.trim();
    if address.is_empty() {
        return Err(QuoteError::InvalidInput("token address is empty".to_string()));
    }
    let address: Address = address
        .parse()
        .map_err(|_| QuoteError::InvalidInput(format!("token address {:?} is not a valid address", token.address)))?;

    let decimals = token.decimals.trim();
    if decimals.is_empty() {
        return Err(QuoteError::InvalidInput("token decimals are empty".to_string()));
    }
    let decimals: u8 = decimals
        .parse()
        .map_err(|_| QuoteError::InvalidInput(format!("token decimals {:?} are not an integer in 0..=255", token.decimals)))?;

    if token.chain_id == 0 {
        return Err(QuoteError::InvalidInput("chain id must be positive".to_string()));
    }

    Ok(Token {
        address,
        decimals,
        chain_id: token.chain_id,
    })
}

pub fn parse_exchange_rate(exchange_rate: &str) -> Result<f64, QuoteError> {
    match exchange_rate.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(QuoteError::InvalidInput(format!(
            "exchange rate {:?} is not a positive decimal",
            exchange_rate
        ))),
    }
}

/// Prices tokens against the deepest reference-asset pool on their chain.
#[derive(Clone)]
pub struct Quoter {
    reader: Arc<dyn ChainReader>,
    registry: Arc<ChainRegistry>,
}

impl Quoter {
    /// Quoter over the built-in chain registry.
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self::with_registry(reader, Arc::new(ChainRegistry::global().clone()))
    }

    pub fn with_registry(reader: Arc<dyn ChainReader>, registry: Arc<ChainRegistry>) -> Self {
        Self { reader, registry }
    }

    pub fn reader(&self) -> &dyn ChainReader {
        self.reader.as_ref()
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub async fn get_quote(&self, token: &TokenDescriptor, exchange_rate: &str) -> Result<QuoteResult, QuoteError> {
        quote_with_registry(&self.registry, self.reader.as_ref(), token, exchange_rate).await
    }
}

/// Quote `token` in USD using the built-in chain registry.
pub async fn get_quote(
    token: &TokenDescriptor,
    reader: &dyn ChainReader,
    exchange_rate: &str,
) -> Result<QuoteResult, QuoteError> {
    quote_with_registry(ChainRegistry::global(), reader, token, exchange_rate).await
}

pub async fn quote_with_registry(
    registry: &ChainRegistry,
    reader: &dyn ChainReader,
    token: &TokenDescriptor,
    exchange_rate: &str,
) -> Result<QuoteResult, QuoteError> {
    let token = validate_token(token)?;
    let rate = parse_exchange_rate(exchange_rate)?;

    let (reference, candidates) = get_pool_addresses(registry, token.chain_id, token.address)?;
    debug!(
        "Quoting {:?} on chain {} against {} across {} pools",
        token.address,
        token.chain_id,
        reference.symbol,
        candidates.len()
    );

    let best = get_best_pool_data(reader, &candidates, &reference)
        .await
        .ok_or(QuoteError::NoPoolFound {
            token: token.address,
            chain_id: token.chain_id,
        })?;

    let price = calculate_adjusted_price(
        best.sqrt_price_x96(),
        token.decimals,
        best.token0_is_reference,
        rate,
    );
    if !price.is_finite() || price <= 0.0 {
        warn!(
            "Pool {:?} ({}) yields unrepresentable price {} for {:?}",
            best.candidate.address, best.candidate.tier, price, token.address
        );
        return Err(QuoteError::NoPoolFound {
            token: token.address,
            chain_id: token.chain_id,
        });
    }

    info!(
        "Best pool for {:?}: {:?} ({}) liquidity {} price {}",
        token.address, best.candidate.address, best.candidate.tier, best.liquidity, price
    );

    Ok(QuoteResult {
        address: best.candidate.address,
        fee: best.candidate.tier.label().to_string(),
        price,
        pool_contract: best.candidate.address,
        liquidity: best.liquidity,
        quoted_at: chrono::Utc::now(),
    })
}
