use abi::{Pool, TransferRecord};
use log::debug;
use num_bigint::{BigInt, BigUint};
use num_traits::{Num, Zero};
use std::collections::HashMap;

use crate::error::BalanceError;

/// Net raw amount each holder has put into the pool, keyed by lowercase address.
pub type HolderBalances = HashMap<String, BigInt>;

/// Folds a pool's transfers into per-holder net balances.
///
/// A transfer into the pool credits its sender, a transfer out of the pool
/// debits its receiver, and anything else is ignored. Holders that end at
/// exactly zero are removed. The first malformed amount aborts the fold.
pub fn reconstruct_balances(
    transfers: &[TransferRecord],
    pool: &Pool,
) -> Result<HolderBalances, BalanceError> {
    let pool_addr = pool.address.to_lowercase();
    let mut holders: HolderBalances = HashMap::with_capacity(3000);
    let mut ignored = 0usize;

    for tx in transfers {
        let value = parse_amount(tx)?;

        let to_addr = tx.to.to_lowercase();
        let from_addr = tx.from.to_lowercase();
        if to_addr == pool_addr {
            *holders.entry(from_addr).or_insert_with(BigInt::zero) += value;
        } else if from_addr == pool_addr {
            *holders.entry(to_addr).or_insert_with(BigInt::zero) -= value;
        } else {
            ignored += 1;
        }
    }

    let before = holders.len();
    holders.retain(|_, balance| !balance.is_zero());

    debug!(
        "{}: {} holders from {} transfers ({} not touching the pool, {} withdrew everything)",
        pool.symbol,
        holders.len(),
        transfers.len(),
        ignored,
        before - holders.len()
    );
    Ok(holders)
}

/// Raw amounts are plain base-10 digits; signs, separators and blanks are rejected.
pub fn parse_amount(tx: &TransferRecord) -> Result<BigInt, BalanceError> {
    let malformed = || BalanceError::MalformedAmount {
        value: tx.value.clone(),
        tx_hash: tx.hash.clone(),
    };
    if tx.value.is_empty() || !tx.value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    BigUint::from_str_radix(&tx.value, 10)
        .map(BigInt::from)
        .map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const POOL: &str = "0xFDC28897A1E32B595f1f4f1D3aE0Df93B1eee452";
    const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
    const BOB: &str = "0x0000000000000000000000000000000000000b0b";
    const CAROL: &str = "0x00000000000000000000000000000000000ca401";

    fn transfer(from: &str, to: &str, value: &str) -> TransferRecord {
        TransferRecord {
            hash: format!("{}-{}-{}", from, to, value),
            from: from.to_string(),
            to: to.to_string(),
            value: value.to_string(),
            token_symbol: "LINK".to_string(),
            ..Default::default()
        }
    }

    fn pool() -> Pool {
        Pool::new(POOL, "LINK")
    }

    fn big(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn test_deposit_and_withdrawal() {
        let transfers = vec![
            transfer(ALICE, POOL, "5000000000000000000"),
            transfer(BOB, POOL, "3000000000000000000"),
            transfer(POOL, ALICE, "2000000000000000000"),
        ];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        assert_eq!(holders.len(), 2);
        assert_eq!(holders[ALICE], big("3000000000000000000"));
        assert_eq!(holders[BOB], big("3000000000000000000"));
    }

    #[test]
    fn test_address_case_is_ignored() {
        let transfers = vec![
            transfer(&ALICE.to_uppercase().replace("0X", "0x"), &POOL.to_lowercase(), "10"),
            transfer(&POOL.to_uppercase().replace("0X", "0x"), ALICE, "4"),
        ];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[ALICE], BigInt::from(6));
    }

    #[test]
    fn test_transfer_between_others_is_ignored() {
        let transfers = vec![
            transfer(ALICE, POOL, "10"),
            transfer(ALICE, BOB, "99999"),
        ];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        assert_eq!(holders.len(), 1);
        assert!(!holders.contains_key(BOB));
        assert_eq!(holders[ALICE], BigInt::from(10));
    }

    #[test]
    fn test_fully_withdrawn_holder_is_dropped() {
        let transfers = vec![
            transfer(ALICE, POOL, "10"),
            transfer(BOB, POOL, "7"),
            transfer(POOL, BOB, "7"),
        ];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        assert_eq!(holders.len(), 1);
        assert!(!holders.contains_key(BOB));
    }

    #[test]
    fn test_withdrawal_without_deposit_goes_negative() {
        let transfers = vec![transfer(POOL, CAROL, "5")];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        assert_eq!(holders[CAROL], BigInt::from(-5));
    }

    #[test]
    fn test_amounts_beyond_u128() {
        let huge = "340282366920938463463374607431768211456000";
        let holders = reconstruct_balances(&[transfer(ALICE, POOL, huge)], &pool()).unwrap();
        assert_eq!(holders[ALICE], big(huge));
    }

    #[test]
    fn test_sum_equals_net_flow() {
        let transfers = vec![
            transfer(ALICE, POOL, "1000"),
            transfer(BOB, POOL, "250"),
            transfer(POOL, ALICE, "300"),
            transfer(CAROL, POOL, "75"),
            transfer(BOB, CAROL, "40"),
            transfer(POOL, BOB, "250"),
            transfer(POOL, CAROL, "100"),
        ];
        let holders = reconstruct_balances(&transfers, &pool()).unwrap();
        let sum: BigInt = holders.values().sum();
        let deposits = BigInt::from(1000 + 250 + 75);
        let withdrawals = BigInt::from(300 + 250 + 100);
        assert_eq!(sum, deposits - withdrawals);
        assert!(holders.values().all(|b| !b.is_zero()));
    }

    #[test]
    fn test_malformed_amount_aborts() {
        let transfers = vec![transfer(ALICE, POOL, "10"), transfer(BOB, POOL, "abc")];
        let err = reconstruct_balances(&transfers, &pool()).unwrap_err();
        assert_eq!(
            err,
            BalanceError::MalformedAmount {
                value: "abc".to_string(),
                tx_hash: transfers[1].hash.clone(),
            }
        );
    }

    #[test]
    fn test_parse_amount_is_strict() {
        for bad in ["", "-5", "+5", "1_000", "1.5", " 7", "0x10"] {
            assert!(parse_amount(&transfer(ALICE, POOL, bad)).is_err(), "{:?}", bad);
        }
        assert_eq!(parse_amount(&transfer(ALICE, POOL, "0")).unwrap(), BigInt::zero());
        assert_eq!(parse_amount(&transfer(ALICE, POOL, "007")).unwrap(), BigInt::from(7));
    }
}
