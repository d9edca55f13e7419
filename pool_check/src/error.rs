use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request URL carries the API key, so it is never kept here.
    #[error("ledger request failed")]
    Transport(#[source] reqwest::Error),
    #[error("malformed ledger response")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("explorer rejected request ({message}): {detail}")]
    Rejected { message: String, detail: String },
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Transport(err.without_url())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("could not convert {value} (tx {tx_hash})")]
    MalformedAmount { value: String, tx_hash: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("{var} must be a valid block number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("invalid pool entry {0:?}, expected 0x<40 hex digits>:SYMBOL")]
    InvalidPool(String),
    #[error("start block {start} is after end block {end}")]
    InvalidBlockRange { start: u64, end: u64 },
}

/// Failure of one pool's analysis.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("analysis of {symbol} pool failed")]
    Ledger {
        symbol: String,
        #[source]
        source: LedgerError,
    },
    #[error("analysis of {symbol} pool failed")]
    Balance {
        symbol: String,
        #[source]
        source: BalanceError,
    },
}
