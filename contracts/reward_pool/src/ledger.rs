use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::config;
use crate::PoolError;

// ── Storage keys ────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const ACCOUNT: Symbol = symbol_short!("ACCT");

// ── Types ───────────────────────────────────────────────────────────────────

/// Pool-wide accounting state. One entry per contract, loaded into an owned
/// value at the top of each call and written back once the call succeeds.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    /// Sum of every account's `balance`.
    pub total_staked: i128,
    /// Cumulative reward per staked unit, scaled by `rewards::PRECISION`.
    pub reward_per_token_stored: i128,
    /// Reward units emitted per second in the current window.
    pub reward_rate: i128,
    pub period_finish: u64,
    pub last_update_time: u64,
}

/// A staker's position. Created on first interaction, never removed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub balance: i128,
    /// Accumulator value at the account's last checkpoint.
    pub reward_per_token_paid: i128,
    /// Settled but unpaid reward.
    pub accrued_reward: i128,
    /// Gross reward ever paid out to this account.
    pub lifetime_reward: i128,
}

/// A reward payout taken off an account, split between staker and treasury.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub gross: i128,
    pub net: i128,
    pub fee: i128,
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn account_key(owner: &Address) -> (Symbol, Address) {
    (ACCOUNT, owner.clone())
}

pub fn load_pool(env: &Env) -> PoolState {
    env.storage().instance().get(&POOL).unwrap_or_default()
}

pub fn save_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
}

/// Missing accounts read as an all-zero position.
pub fn load_account(env: &Env, owner: &Address) -> Account {
    env.storage()
        .persistent()
        .get(&account_key(owner))
        .unwrap_or_default()
}

pub fn save_account(env: &Env, owner: &Address, account: &Account) {
    let key = account_key(owner);
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, config::TTL_THRESHOLD, config::TTL_EXTEND_TO);
}

// ── Ledger mutations ────────────────────────────────────────────────────────

/// Add `amount` to both the account and the pool total.
pub fn credit(pool: &mut PoolState, account: &mut Account, amount: i128) {
    account.balance = account.balance.saturating_add(amount);
    pool.total_staked = pool.total_staked.saturating_add(amount);
}

/// Remove `amount` from both the account and the pool total.
///
/// Fails without touching either side when the account holds less than
/// `amount`.
pub fn debit(pool: &mut PoolState, account: &mut Account, amount: i128) -> Result<(), PoolError> {
    if amount > account.balance {
        return Err(PoolError::InsufficientBalance);
    }

    account.balance = account.balance.saturating_sub(amount);
    pool.total_staked = pool.total_staked.saturating_sub(amount);
    Ok(())
}

/// Take the account's accrued reward for payment, if the payout policy
/// allows it.
///
/// Returns `None` and leaves the account untouched when there is nothing
/// accrued, when the amount is below `min_claim`, or when it would not
/// cover `operation_fee`. Deferred amounts stay accrued.
#[allow(clippy::arithmetic_side_effects)]
pub fn take_payout(account: &mut Account, min_claim: i128, operation_fee: i128) -> Option<Payout> {
    let gross = account.accrued_reward;
    if gross <= 0 || gross < min_claim || gross <= operation_fee {
        return None;
    }

    account.accrued_reward = 0;
    account.lifetime_reward = account.lifetime_reward.saturating_add(gross);

    Some(Payout {
        gross,
        net: gross - operation_fee,
        fee: operation_fee,
    })
}
