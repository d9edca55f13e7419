use abi::TransferRecord;
use log::debug;

/// Keeps the records for `symbol`, in ledger order.
///
/// The explorer indexes by address, so a pool's history also carries
/// unrelated tokens sent to it; those are dropped here, not reported.
pub fn filter_by_symbol(records: Vec<TransferRecord>, symbol: &str) -> Vec<TransferRecord> {
    let received = records.len();
    let kept: Vec<TransferRecord> = records
        .into_iter()
        .filter(|record| record.token_symbol == symbol)
        .collect();
    if kept.len() != received {
        debug!(
            "{}: dropped {} of {} records with another token symbol",
            symbol,
            received - kept.len(),
            received
        );
    }
    kept
}
