//! Property-based tests for reward accrual.
//!
//! Invariants tested:
//! - The reward-per-token accumulator never decreases
//! - Earned plus paid rewards never exceed what was funded
//! - `earned` is a pure read
//! - A mid-window top-up rate follows `(amount + leftover) / duration`
//! - Equal-time stakers split rewards by stake share, up to truncation

use proptest::collection::vec;
use proptest::prelude::*;
use reward_pool::period::DEFAULT_REWARD_DURATION;

use crate::common::{Harness, Op};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_accumulator_non_decreasing(ops in vec(any::<Op>(), 1..24)) {
        let mut h = Harness::new();
        let mut last_stored = 0i128;
        let mut last_view = 0i128;

        for op in &ops {
            h.apply(op);

            let stored = h.client.get_pool_state().reward_per_token_stored;
            let view = h.client.reward_per_token();
            prop_assert!(stored >= last_stored, "stored accumulator fell after {:?}", op);
            prop_assert!(view >= last_view, "accumulator view fell after {:?}", op);
            prop_assert!(view >= stored);
            last_stored = stored;
            last_view = view;
        }
    }

    #[test]
    fn prop_rewards_never_exceed_funding(ops in vec(any::<Op>(), 1..24)) {
        let mut h = Harness::new();

        for op in &ops {
            h.apply(op);
            let owed = h.sum_earned() + h.sum_paid();
            prop_assert!(owed <= h.funded, "owed {} > funded {} after {:?}", owed, h.funded, op);
        }
    }

    #[test]
    fn prop_earned_is_idempotent(ops in vec(any::<Op>(), 1..16)) {
        let mut h = Harness::new();
        for op in &ops {
            h.apply(op);
        }

        let state = h.client.get_pool_state();
        for user in h.users.clone() {
            let first = h.client.earned(&user);
            let second = h.client.earned(&user);
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(h.client.get_pool_state(), state);
    }

    #[test]
    fn prop_top_up_rolls_over_leftover(
        first in 172_800i128..=50_000_000,
        second in 1i128..=50_000_000,
        elapsed in 0u64..DEFAULT_REWARD_DURATION,
    ) {
        let mut h = Harness::new();
        prop_assert!(h.notify(first));
        let rate = h.client.reward_rate();
        let finish = h.client.period_finish();

        h.advance(elapsed);
        prop_assert!(h.notify(second));

        let leftover = (finish - h.now) as i128 * rate;
        let expected = (second + leftover) / DEFAULT_REWARD_DURATION as i128;
        prop_assert_eq!(h.client.reward_rate(), expected);
        prop_assert_eq!(h.client.period_finish(), h.now + DEFAULT_REWARD_DURATION);
    }

    #[test]
    fn prop_split_follows_stake_share(
        stake in 1i128..=10_000,
        factor in 1i128..=5,
        funding in 172_800i128..=10_000_000,
        wait in 1u64..=DEFAULT_REWARD_DURATION,
    ) {
        let mut h = Harness::new();
        prop_assert!(h.deposit(0, stake));
        prop_assert!(h.deposit(1, stake * factor));
        h.notify(funding);
        h.advance(wait);

        let small = h.client.earned(&h.users[0]);
        let large = h.client.earned(&h.users[1]);
        prop_assert!(large >= factor * small);
        prop_assert!(large - factor * small < factor);
    }
}
