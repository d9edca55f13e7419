use abi::Pool;
use log::debug;
use regex::Regex;
use std::env;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/api";

/// YAM deploy block.
pub const DEFAULT_START_BLOCK: u64 = 10636698;
/// Last block before the yCRV pool opened.
pub const DEFAULT_END_BLOCK: u64 = 10645800;

const DEFAULT_POOLS: &[(&str, &str)] = &[
    ("0x6009a344c7f993b16eba2c673fefd2e07f9be5fd", "LEND"),
    ("0xFDC28897A1E32B595f1f4f1D3aE0Df93B1eee452", "LINK"),
    ("0xcFe1E539AcB2D489a651cA011a6eB93d32f97E23", "MKR"),
    ("0x6c3FC1FFDb14D92394f40eeC91D9Ce8B807f132D", "SNX"),
    ("0x587A07cE5c265A38Dd6d42def1566BA73eeb06F5", "WETH"),
    ("0xc5B6488c7D5BeD173B76Bd5DCA712f45fB9EaEaB", "YFI"),
    ("0x8538e5910c6f80419cd3170c26073ff238048c9e", "COMP"),
];

lazy_static::lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Everything one run needs, fixed before the first pool is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub api_url: String,
    pub api_key: String,
    pub start_block: u64,
    pub end_block: u64,
    pub pools: Vec<Pool>,
}

impl AnalysisConfig {
    /// The YAM launch farming snapshot with the given API key.
    pub fn with_defaults(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            start_block: DEFAULT_START_BLOCK,
            end_block: DEFAULT_END_BLOCK,
            pools: default_pools(),
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ETHERSCAN_API")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar("ETHERSCAN_API"))?;
        let mut config = Self::with_defaults(api_key.trim());

        if let Some(url) = lookup("ETHERSCAN_URL") {
            config.api_url = url.trim().to_string();
        }
        if let Some(value) = lookup("START_BLOCK") {
            config.start_block = parse_block("START_BLOCK", &value)?;
        }
        if let Some(value) = lookup("END_BLOCK") {
            config.end_block = parse_block("END_BLOCK", &value)?;
        }
        if let Some(value) = lookup("POOLS") {
            config.pools = parse_pools(&value)?;
        }

        config.validate()?;
        debug!(
            "config: {} pools, blocks {}..={}",
            config.pools.len(),
            config.start_block,
            config.end_block
        );
        Ok(config)
    }

    /// Like [`AnalysisConfig::from_env`] for a pool given by the caller;
    /// `POOLS` is not read.
    pub fn from_env_for_pool(pool: Pool) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup_for_pool(|name| env::var(name).ok(), pool)
    }

    pub fn from_lookup_for_pool<F>(lookup: F, pool: Pool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_lookup(|name| match name {
            "POOLS" => None,
            _ => lookup(name),
        })?;
        config.pools = vec![pool];
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_block > self.end_block {
            return Err(ConfigError::InvalidBlockRange {
                start: self.start_block,
                end: self.end_block,
            });
        }
        for pool in &self.pools {
            if !is_valid_pool(pool) {
                return Err(ConfigError::InvalidPool(format!(
                    "{}:{}",
                    pool.address, pool.symbol
                )));
            }
        }
        Ok(())
    }
}

pub fn default_pools() -> Vec<Pool> {
    DEFAULT_POOLS
        .iter()
        .map(|(address, symbol)| Pool::new(*address, *symbol))
        .collect()
}

pub fn parse_block(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

/// Parses `address:SYMBOL,address:SYMBOL`, keeping the given order.
pub fn parse_pools(value: &str) -> Result<Vec<Pool>, ConfigError> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(parse_pool)
        .collect()
}

pub fn parse_pool(entry: &str) -> Result<Pool, ConfigError> {
    let (address, symbol) = entry
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidPool(entry.to_string()))?;
    let pool = Pool::new(address.trim(), symbol.trim());
    if !is_valid_pool(&pool) {
        return Err(ConfigError::InvalidPool(entry.to_string()));
    }
    Ok(pool)
}

fn is_valid_pool(pool: &Pool) -> bool {
    ADDRESS_RE.is_match(&pool.address) && !pool.symbol.is_empty()
}
