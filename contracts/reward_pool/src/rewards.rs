use crate::ledger::{Account, PoolState};
use crate::period;

/// Fixed-point scaling factor for the reward-per-token accumulator.
///
/// Reward rates are small integers and stakes can be large, so the raw
/// quotient `rate × elapsed / total_staked` would truncate to zero. Scaling
/// by 10^8 keeps eight decimal places in the accumulator.
pub const PRECISION: i128 = 100_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Advance `stored` by the reward emitted over `elapsed` seconds.
///
/// ```text
/// Δrpt    = reward_rate × elapsed × PRECISION / total_staked
/// new_rpt = stored + Δrpt
/// ```
///
/// With nothing staked the accumulator is frozen: `stored` is returned
/// unchanged and whatever was emitted in the meantime is not attributed.
#[allow(clippy::arithmetic_side_effects)]
pub fn compute_reward_per_token(
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> i128 {
    if total_staked <= 0 {
        return stored;
    }

    // u64::MAX < i128::MAX, so the widening cast is lossless.
    let delta = reward_rate
        .saturating_mul(elapsed as i128)
        .saturating_mul(PRECISION)
        / total_staked;

    stored.saturating_add(delta)
}

/// Reward owed to a position.
///
/// ```text
/// earned = staked × (current_rpt − rpt_paid) / PRECISION + accrued
/// ```
#[allow(clippy::arithmetic_side_effects)]
pub fn earned(staked: i128, current_rpt: i128, rpt_paid: i128, accrued: i128) -> i128 {
    let pending = staked.saturating_mul(current_rpt.saturating_sub(rpt_paid)) / PRECISION;

    accrued.saturating_add(pending)
}

// ── Pool-level views and checkpoint ─────────────────────────────────────────

/// The accumulator as it would read after a refresh at `now`. Pure.
pub fn reward_per_token(pool: &PoolState, now: u64) -> i128 {
    let applicable = period::last_time_reward_applicable(now, pool.period_finish);
    let elapsed = applicable.saturating_sub(pool.last_update_time);

    compute_reward_per_token(
        pool.reward_per_token_stored,
        pool.reward_rate,
        elapsed,
        pool.total_staked,
    )
}

/// Everything `account` could claim at `now`, without touching state.
pub fn earned_at(pool: &PoolState, account: &Account, now: u64) -> i128 {
    earned(
        account.balance,
        reward_per_token(pool, now),
        account.reward_per_token_paid,
        account.accrued_reward,
    )
}

/// Refresh the pool accumulator and, when an account is given, settle it.
///
/// After this call the account's pending reward lives in `accrued_reward`
/// and its snapshot equals `reward_per_token_stored`, so the next
/// interaction only counts accumulation from here on.
pub fn checkpoint(pool: &mut PoolState, account: Option<&mut Account>, now: u64) {
    period::refresh_accumulator(pool, now);

    if let Some(account) = account {
        account.accrued_reward = earned(
            account.balance,
            pool.reward_per_token_stored,
            account.reward_per_token_paid,
            account.accrued_reward,
        );
        account.reward_per_token_paid = pool.reward_per_token_stored;
    }
}
