//! Holder concentration of token pools, rebuilt from each pool's transfer log.
//!
//! Per pool: fetch the ledger, keep the pool token's transfers, fold them into
//! net holder balances, rank the holders and print cumulative shares at fixed
//! ranks. Pools are processed one after another.

pub mod balances;
pub mod config;
pub mod error;
pub mod ingest;
pub mod ledger;
pub mod logging;
pub mod report;

use abi::{Distribution, Pool, TransferRecord};
use log::{info, warn};
use std::io::Write;

use crate::error::PoolError;
use crate::ledger::LedgerSource;

pub use crate::config::AnalysisConfig;
pub use crate::ledger::EtherscanClient;

/// Runs the pure part of the pipeline over an already fetched ledger.
pub fn distribution_from_ledger(
    records: Vec<TransferRecord>,
    pool: &Pool,
) -> Result<Distribution, PoolError> {
    let transfers = ingest::filter_by_symbol(records, &pool.symbol);
    let balances =
        balances::reconstruct_balances(&transfers, pool).map_err(|source| PoolError::Balance {
            symbol: pool.symbol.clone(),
            source,
        })?;
    Ok(report::rank_holders(&pool.symbol, balances))
}

pub async fn analyze_pool<S>(source: &S, pool: &Pool) -> Result<Distribution, PoolError>
where
    S: LedgerSource + ?Sized,
{
    let records = source
        .fetch_transfers(pool)
        .await
        .map_err(|source| PoolError::Ledger {
            symbol: pool.symbol.clone(),
            source,
        })?;
    distribution_from_ledger(records, pool)
}

/// What to do when one pool fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failing pool.
    Abort,
    /// Report the failure and continue with the next pool.
    KeepGoing,
}

#[derive(Debug)]
pub struct PoolOutcome {
    pub pool: Pool,
    pub result: Result<Distribution, PoolError>,
}

/// Analyzes and reports `pools` in order, writing each report to `out` as
/// soon as that pool is done.
///
/// Under [`FailurePolicy::Abort`] the first error is returned and no later
/// pool is fetched. Under [`FailurePolicy::KeepGoing`] a failure line is
/// written in place of the report and every outcome is returned.
pub async fn run_pools<S, W>(
    source: &S,
    pools: &[Pool],
    policy: FailurePolicy,
    out: &mut W,
) -> anyhow::Result<Vec<PoolOutcome>>
where
    S: LedgerSource + ?Sized,
    W: Write,
{
    let mut outcomes = Vec::with_capacity(pools.len());
    for pool in pools {
        let result = match analyze_pool(source, pool).await {
            Ok(distribution) => {
                info!(
                    "{}: {} holders, {} tokens",
                    pool.symbol,
                    distribution.holders.len(),
                    distribution.total_tokens
                );
                report::write_report(out, &distribution)?;
                Ok(distribution)
            }
            Err(err) if policy == FailurePolicy::Abort => return Err(err.into()),
            Err(err) => {
                warn!("{}: skipping pool after error", pool.symbol);
                writeln!(out, "{}\n", failure_line(&pool.symbol, &err))?;
                Err(err)
            }
        };
        outcomes.push(PoolOutcome {
            pool: pool.clone(),
            result,
        });
    }
    Ok(outcomes)
}

/// `SYMBOL: analysis failed: <cause chain>`, written in place of a report.
pub fn failure_line(symbol: &str, err: &PoolError) -> String {
    let cause = match std::error::Error::source(err) {
        Some(source) => error_chain(source),
        None => err.to_string(),
    };
    format!("{}: analysis failed: {}", symbol, cause)
}

/// `outer: inner: root` rendering of an error and its sources.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
