//! Property-based tests for the stake ledger.
//!
//! Invariants tested:
//! - `total_staked` always equals the sum of account balances, and the
//!   staking tokens actually held by the pool
//! - A withdraw above the caller's balance changes nothing

use proptest::collection::vec;
use proptest::prelude::*;
use reward_pool::PoolError;

use crate::common::{Harness, Op};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// After every step of any history, the ledger total matches the parts.
    #[test]
    fn prop_total_staked_matches_balances(ops in vec(any::<Op>(), 1..24)) {
        let mut h = Harness::new();

        for op in &ops {
            h.apply(op);

            let total = h.client.total_staked();
            prop_assert_eq!(total, h.sum_balances(), "after {:?}", op);
            prop_assert_eq!(total, h.staking_held_by_pool(), "after {:?}", op);
            prop_assert!(!h.client.is_locked());
        }
    }

    /// Over-withdrawing always fails with `InsufficientBalance` and leaves
    /// the position and the pool as they were.
    #[test]
    fn prop_over_withdraw_is_rejected(
        stake in 1i128..=100_000,
        excess in 1i128..=100_000,
        wait in 0u64..=200_000,
    ) {
        let mut h = Harness::new();
        h.deposit(0, stake);
        h.notify(172_800);
        h.advance(wait);

        let staker = h.users[0].clone();
        let account = h.client.get_account(&staker);
        let state = h.client.get_pool_state();

        match h.client.try_withdraw(&staker, &(stake + excess)) {
            Err(Ok(e)) => prop_assert_eq!(e, PoolError::InsufficientBalance),
            _ => prop_assert!(false, "Expected InsufficientBalance error"),
        }

        prop_assert_eq!(h.client.get_account(&staker), account);
        prop_assert_eq!(h.client.get_pool_state(), state);
    }
}
