use crate::ledger::PoolState;
use crate::rewards;

/// Default length of a distribution window: two days.
pub const DEFAULT_REWARD_DURATION: u64 = 86_400 * 2;

/// `min(now, period_finish)`: rewards stop accruing once the window closes.
pub fn last_time_reward_applicable(now: u64, period_finish: u64) -> u64 {
    now.min(period_finish)
}

/// Bring `reward_per_token_stored` up to `now` at the current rate.
pub fn refresh_accumulator(pool: &mut PoolState, now: u64) {
    pool.reward_per_token_stored = rewards::reward_per_token(pool, now);
    pool.last_update_time = last_time_reward_applicable(now, pool.period_finish);
}

/// Rate for a window funded with `amount` starting at `now`.
///
/// A top-up inside an active window folds the unspent remainder of the
/// current window into the new rate, so nothing already funded is dropped.
/// Integer division leaves at most `duration - 1` units of dust.
#[allow(clippy::arithmetic_side_effects)]
pub fn next_reward_rate(pool: &PoolState, amount: i128, now: u64, duration: u64) -> i128 {
    let duration = duration.max(1) as i128;

    if now >= pool.period_finish {
        return amount / duration;
    }

    let remaining = (pool.period_finish - now) as i128;
    let leftover = remaining.saturating_mul(pool.reward_rate);

    amount.saturating_add(leftover) / duration
}

/// Open a fresh window of `duration` seconds funded with `amount`.
///
/// The accumulator is flushed at the old rate first; stakers keep whatever
/// they earned before the rate changed.
pub fn notify_new_reward(pool: &mut PoolState, amount: i128, now: u64, duration: u64) {
    refresh_accumulator(pool, now);

    pool.reward_rate = next_reward_rate(pool, amount, now, duration);
    pool.last_update_time = now;
    pool.period_finish = now.saturating_add(duration);
}
