pub mod config;
pub mod discovery;
pub mod error;
pub mod liquidity_pools;
pub mod pricing;
pub mod quote;
pub mod rpc;
pub mod types;

pub use config::ChainRegistry;
pub use error::{FetchError, QuoteError};
pub use quote::{get_quote, Quoter};
pub use rpc::{ChainReader, ProviderReader};
pub use types::{FeeTier, QuoteResult, TokenDescriptor};
