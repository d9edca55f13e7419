use abi::{ExplorerResponse, ExplorerResult, Pool, TransferRecord};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::config::AnalysisConfig;
use crate::error::LedgerError;

/// Where a pool's transfer history comes from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerSource {
    /// Every token transfer touching `pool.address` in the configured block
    /// range, oldest first.
    async fn fetch_transfers(&self, pool: &Pool) -> Result<Vec<TransferRecord>, LedgerError>;
}

/// `tokentx` endpoint of an Etherscan-compatible explorer.
pub struct EtherscanClient {
    client: Client,
    api_url: String,
    api_key: String,
    start_block: u64,
    end_block: u64,
}

impl EtherscanClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            start_block: config.start_block,
            end_block: config.end_block,
        }
    }

    pub fn tokentx_url(&self, address: &str) -> String {
        format!(
            "{}?module=account&action=tokentx&address={}&startblock={}&endblock={}&sort=asc&apikey={}",
            self.api_url, address, self.start_block, self.end_block, self.api_key
        )
    }
}

#[async_trait]
impl LedgerSource for EtherscanClient {
    async fn fetch_transfers(&self, pool: &Pool) -> Result<Vec<TransferRecord>, LedgerError> {
        debug!(
            "fetching {} transfers for {} (blocks {}..={})",
            pool.symbol, pool.address, self.start_block, self.end_block
        );
        let response = self
            .client
            .get(self.tokentx_url(&pool.address))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let records = parse_response(&body)?;
        debug!("{}: received {} transfers", pool.symbol, records.len());
        Ok(records)
    }
}

/// Unwraps the `{status, message, result}` envelope.
///
/// An empty `result` array is an empty ledger whatever the status says
/// ("No transactions found" comes back with status "0").
pub fn parse_response(body: &str) -> Result<Vec<TransferRecord>, LedgerError> {
    let response: ExplorerResponse = serde_json::from_str(body)?;
    match response.result {
        ExplorerResult::Transfers(records) => Ok(records),
        ExplorerResult::Message(detail) => Err(LedgerError::Rejected {
            message: response.message,
            detail,
        }),
    }
}
