use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use univ3_usd_quote::config::{config_path, load_chains_file};
use univ3_usd_quote::liquidity_pools::get_pool_reserves_reference;
use univ3_usd_quote::{ProviderReader, Quoter, TokenDescriptor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// ERC-20 token address
    token: String,
    #[arg(long)]
    decimals: String,
    #[arg(long, default_value_t = 1)]
    chain_id: u64,
    /// USD price of the chain's wrapped native asset
    #[arg(long)]
    exchange_rate: String,
    /// Overrides RPC_URL
    #[arg(long)]
    rpc_url: Option<String>,
    /// Also print the reference asset held by the winning pool
    #[arg(long)]
    reserves: bool,
    #[arg(long)]
    json: bool,
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv().ok();

    let rpc_url = match cli.rpc_url.clone() {
        Some(url) => url,
        None => std::env::var("RPC_URL").map_err(|_| eyre::eyre!("RPC_URL must be set"))?,
    };

    let chains_path = config_path("CHAINS_JSON", "chains.json");
    let registry = load_chains_file(&chains_path.to_string_lossy())?;

    let reader = ProviderReader::connect(&rpc_url).await?;
    match reader.chain_id().await {
        Ok(id) if id != cli.chain_id => {
            warn!("RPC endpoint reports chain {} but quoting for chain {}", id, cli.chain_id)
        }
        Ok(_) => {}
        Err(e) => warn!("Could not read chain id from RPC endpoint: {:?}", e),
    }

    let quoter = Quoter::with_registry(Arc::new(reader), Arc::new(registry));
    let token = TokenDescriptor::new(cli.token.clone(), cli.decimals.clone(), cli.chain_id);
    let quote = quoter.get_quote(&token, &cli.exchange_rate).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        info!("Pool:  {:?}", quote.address);
        info!("Fee:   {}", quote.fee);
        info!("Price: {:.8} USD", quote.price);
        info!("At:    {}", quote.quoted_at.to_rfc3339());
    }

    if cli.reserves {
        if let Some(reference) = quoter.registry().reference_asset(cli.chain_id) {
            match get_pool_reserves_reference(quoter.reader(), quote.address, reference).await {
                Ok(amount) => info!("Reserves: {:.6} {}", amount, reference.symbol),
                Err(e) => warn!("Could not read pool reserves: {}", e),
            }
        }
    }

    Ok(())
}
