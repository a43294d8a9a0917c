use crate::error::FetchError;
use crate::pricing::u256_to_f64;
use crate::rpc::ChainReader;
use crate::types::{PoolCandidate, PoolState, ReferenceAsset, Slot0};
use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use futures::future::join_all;
use tracing::debug;

sol! {
    /// Read-only slice of the Uniswap V3 pool interface.
    interface IUniswapV3Pool {
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked);
        function liquidity() external view returns (uint128);
        function token0() external view returns (address);
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Encode `call`, send it through `reader` and decode the strictly validated return.
async fn read<C: SolCall>(reader: &dyn ChainReader, address: Address, call: &C) -> Result<C::Return, FetchError> {
    let calldata = call.abi_encode();
    let data = reader
        .read_contract_function(address, C::SIGNATURE, calldata.into())
        .await
        .map_err(|e| FetchError::Read {
            address,
            function: C::SIGNATURE,
            reason: format!("{:#}", e),
        })?;
    decode::<C>(address, &data)
}

fn decode<C: SolCall>(address: Address, data: &[u8]) -> Result<C::Return, FetchError> {
    C::abi_decode_returns(data, true).map_err(|e| FetchError::Decode {
        address,
        function: C::SIGNATURE,
        reason: e.to_string(),
    })
}

impl From<IUniswapV3Pool::slot0Return> for Slot0 {
    fn from(ret: IUniswapV3Pool::slot0Return) -> Self {
        Self {
            sqrt_price_x96: U256::from(ret.sqrtPriceX96),
            tick: ret.tick.as_i32(),
            observation_index: ret.observationIndex,
            observation_cardinality: ret.observationCardinality,
            observation_cardinality_next: ret.observationCardinalityNext,
            fee_protocol: ret.feeProtocol,
            unlocked: ret.unlocked,
        }
    }
}

/// Decode the output of `slot0()`.
pub fn decode_slot0(address: Address, data: &[u8]) -> Result<Slot0, FetchError> {
    decode::<IUniswapV3Pool::slot0Call>(address, data).map(Slot0::from)
}

pub async fn read_slot0(reader: &dyn ChainReader, pool: Address) -> Result<Slot0, FetchError> {
    read(reader, pool, &IUniswapV3Pool::slot0Call {}).await.map(Slot0::from)
}

pub async fn read_liquidity(reader: &dyn ChainReader, pool: Address) -> Result<u128, FetchError> {
    Ok(read(reader, pool, &IUniswapV3Pool::liquidityCall {}).await?._0)
}

pub async fn read_token0(reader: &dyn ChainReader, pool: Address) -> Result<Address, FetchError> {
    Ok(read(reader, pool, &IUniswapV3Pool::token0Call {}).await?._0)
}

/// Read price state, liquidity and token0 of one candidate concurrently.
/// Any failed read fails the whole candidate.
pub async fn fetch_pool_data(
    reader: &dyn ChainReader,
    candidate: PoolCandidate,
    reference: &ReferenceAsset,
) -> Result<PoolState, FetchError> {
    let (slot0, liquidity, token0) = futures::try_join!(
        read_slot0(reader, candidate.address),
        read_liquidity(reader, candidate.address),
        read_token0(reader, candidate.address),
    )?;

    if slot0.sqrt_price_x96.is_zero() {
        return Err(FetchError::Uninitialized(candidate.address));
    }

    Ok(PoolState {
        candidate,
        slot0,
        liquidity,
        token0_is_reference: token0 == reference.address,
    })
}

/// Fold fetch results in enumeration order, keeping the first pool with
/// strictly greater liquidity. Failures and empty pools are skipped.
pub fn select_deepest<I>(results: I) -> Option<PoolState>
where
    I: IntoIterator<Item = Result<PoolState, FetchError>>,
{
    results.into_iter().fold(None::<PoolState>, |best, result| match result {
        Ok(state) if state.liquidity > best.map_or(0, |b| b.liquidity) => Some(state),
        Ok(state) => {
            debug!(
                "Pool {:?} ({}) skipped with liquidity {}",
                state.candidate.address, state.candidate.tier, state.liquidity
            );
            best
        }
        Err(e) => {
            debug!("Candidate dropped: {}", e);
            best
        }
    })
}

/// Fetch every candidate concurrently and pick the deepest pool.
pub async fn get_best_pool_data(
    reader: &dyn ChainReader,
    candidates: &[PoolCandidate],
    reference: &ReferenceAsset,
) -> Option<PoolState> {
    let results = join_all(
        candidates
            .iter()
            .map(|candidate| fetch_pool_data(reader, *candidate, reference)),
    )
    .await;
    select_deepest(results)
}

/// Reference asset held by `pool`, in whole units.
pub async fn get_pool_reserves_reference(
    reader: &dyn ChainReader,
    pool: Address,
    reference: &ReferenceAsset,
) -> Result<f64, FetchError> {
    let call = IERC20::balanceOfCall { account: pool };
    let raw = read(reader, reference.address, &call).await?._0;
    Ok(u256_to_f64(raw) / 10f64.powi(reference.decimals as i32))
}
