use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// One token transfer as the block explorer reports it.
///
/// Only `from`, `to`, `value` and `token_symbol` feed the balance fold; the
/// remaining fields are carried for logging and error context.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(default)]
    pub block_number: String,
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub block_hash: String,
    pub from: String,
    #[serde(default)]
    pub contract_address: String,
    pub to: String,
    /// Raw amount in the token's smallest unit, base-10.
    pub value: String,
    #[serde(default)]
    pub token_name: String,
    pub token_symbol: String,
}

/// `result` is an array on success and a plain string when the explorer
/// refuses the request (bad key, rate limit, ...).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ExplorerResult {
    Transfers(Vec<TransferRecord>),
    Message(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExplorerResponse {
    pub status: String,
    pub message: String,
    pub result: ExplorerResult,
}

/// A token pool under analysis: the pool contract (custodian of the deposits)
/// and the symbol of the token it holds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pool {
    pub address: String,
    pub symbol: String,
}

impl Pool {
    pub fn new(address: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedHolder {
    pub address: String,
    /// Whole tokens, after decimal normalization.
    pub balance: BigInt,
    pub percent: f64,
}

/// Ranked holders of one pool, largest first, with the whole-token total.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Distribution {
    pub symbol: String,
    pub total_tokens: BigInt,
    pub holders: Vec<RankedHolder>,
}
