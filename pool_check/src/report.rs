use abi::{Distribution, RankedHolder};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::io::{self, Write};

use crate::balances::HolderBalances;

/// Ranks at which cumulative concentration is reported (1-based).
pub const CUTOFFS: [usize; 7] = [1, 5, 10, 25, 50, 100, 250];

lazy_static::lazy_static! {
    /// 10^18: every pooled token uses 18 decimals.
    pub static ref TOKEN_SCALE: BigInt = {
        let one_gwei = BigInt::from(1_000_000_000u64);
        &one_gwei * &one_gwei
    };
}

/// Converts raw balances to whole tokens and ranks holders largest first.
///
/// Division truncates toward zero. Equal balances are ordered by address so
/// the ranking is the same on every run. When the total is zero every share
/// is reported as 0%.
pub fn rank_holders(symbol: &str, balances: HolderBalances) -> Distribution {
    let mut total_tokens = BigInt::zero();
    let mut holders: Vec<RankedHolder> = balances
        .into_iter()
        .map(|(address, raw)| {
            let balance = raw / &*TOKEN_SCALE;
            total_tokens += &balance;
            RankedHolder {
                address,
                balance,
                percent: 0.0,
            }
        })
        .collect();

    holders.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.address.cmp(&b.address))
    });

    let total = total_tokens.to_f64().unwrap_or(0.0);
    if total != 0.0 {
        for holder in holders.iter_mut() {
            holder.percent = holder.balance.to_f64().unwrap_or(0.0) / total * 100.0;
        }
    }

    Distribution {
        symbol: symbol.to_string(),
        total_tokens,
        holders,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcentrationLine {
    /// The top `rank` holders together.
    Top {
        rank: usize,
        percent: f64,
        tokens: BigInt,
    },
    /// All holders; emitted once, after the last one.
    Total { holders: usize, tokens: BigInt },
}

impl fmt::Display for ConcentrationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationLine::Top {
                rank: 1,
                percent,
                tokens,
            } => write!(f, "The top 1 holder has {:.4}% of pool ({} tokens)", percent, tokens),
            ConcentrationLine::Top {
                rank,
                percent,
                tokens,
            } => write!(
                f,
                "The top {} holders have {:.4}% of pool ({} tokens)",
                rank, percent, tokens
            ),
            ConcentrationLine::Total { holders, tokens } => {
                write!(f, "{} holders in total ({} tokens)", holders, tokens)
            }
        }
    }
}

/// Single pass over the ranking, accumulating share and amount.
///
/// A pool with exactly `N` holders for a cutoff `N` gets both the cutoff
/// line and the total line.
pub fn concentration_lines(holders: &[RankedHolder]) -> Vec<ConcentrationLine> {
    let mut lines = Vec::new();
    let mut accumulated_percent = 0.0f64;
    let mut accumulated_amount = BigInt::zero();

    for (i, holder) in holders.iter().enumerate() {
        let rank = i + 1;
        accumulated_percent += holder.percent;
        accumulated_amount += &holder.balance;

        if CUTOFFS.contains(&rank) {
            lines.push(ConcentrationLine::Top {
                rank,
                percent: accumulated_percent,
                tokens: accumulated_amount.clone(),
            });
        }
        if rank == holders.len() {
            lines.push(ConcentrationLine::Total {
                holders: holders.len(),
                tokens: accumulated_amount.clone(),
            });
        }
    }
    lines
}

pub fn write_report<W: Write>(out: &mut W, distribution: &Distribution) -> io::Result<()> {
    writeln!(
        out,
        "Distribution for {} out of total {} tokens",
        distribution.symbol, distribution.total_tokens
    )?;
    for line in concentration_lines(&distribution.holders) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)
}
