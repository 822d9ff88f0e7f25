use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::period::DEFAULT_REWARD_DURATION;
use crate::PoolError;

// ── Storage key constants ───────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const DISTRIBUTOR: Symbol = symbol_short!("DISTRIB");
const TREASURY: Symbol = symbol_short!("TREASURY");
const OPERATION_FEE: Symbol = symbol_short!("OP_FEE");
const MIN_CLAIM: Symbol = symbol_short!("MIN_CLM");
const DURATION: Symbol = symbol_short!("DURATION");
const WITHDRAW_ON: Symbol = symbol_short!("WDR_ON");

pub const TTL_THRESHOLD: u32 = 518_400;
pub const TTL_EXTEND_TO: u32 = 1_036_800;

// ── Types ───────────────────────────────────────────────────────────────────

/// Tunables fixed at `initialize`. Fee and threshold can be changed later by
/// the admin; duration and withdraw policy cannot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSettings {
    /// Length of each distribution window in seconds.
    pub reward_duration: u64,
    /// Flat cut of every reward payout, routed to the treasury.
    pub operation_fee: i128,
    /// Accrued rewards below this stay in the pool until they grow.
    pub min_claim_amount: i128,
    /// `false` makes deposits permanent.
    pub withdraw_enabled: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            reward_duration: DEFAULT_REWARD_DURATION,
            operation_fee: 0,
            min_claim_amount: 0,
            withdraw_enabled: true,
        }
    }
}

impl PoolSettings {
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.reward_duration == 0 || self.operation_fee < 0 || self.min_claim_amount < 0 {
            return Err(PoolError::InvalidConfig);
        }
        Ok(())
    }
}

/// Snapshot of the pool configuration returned by `get_config`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub admin: Address,
    pub staking_token: Address,
    pub reward_token: Address,
    pub reward_distributor: Address,
    pub treasury: Address,
    pub reward_duration: u64,
    pub operation_fee: i128,
    pub min_claim_amount: i128,
    pub withdraw_enabled: bool,
}

// ── Lifecycle ───────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn require_initialized(env: &Env) -> Result<(), PoolError> {
    if !is_initialized(env) {
        return Err(PoolError::NotInitialized);
    }
    Ok(())
}

/// Write the full initial configuration. The admin doubles as the first
/// reward distributor.
pub fn store_initial(
    env: &Env,
    admin: &Address,
    staking_token: &Address,
    reward_token: &Address,
    treasury: &Address,
    settings: &PoolSettings,
) {
    env.storage().instance().set(&ADMIN, admin);
    env.storage().instance().set(&DISTRIBUTOR, admin);
    env.storage().instance().set(&STAKE_TOKEN, staking_token);
    env.storage().instance().set(&REWARD_TOKEN, reward_token);
    env.storage().instance().set(&TREASURY, treasury);
    env.storage().instance().set(&DURATION, &settings.reward_duration);
    env.storage().instance().set(&OPERATION_FEE, &settings.operation_fee);
    env.storage().instance().set(&MIN_CLAIM, &settings.min_claim_amount);
    env.storage().instance().set(&WITHDRAW_ON, &settings.withdraw_enabled);
    env.storage().instance().set(&INITIALIZED, &true);
    extend_instance_ttl(env);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn snapshot(env: &Env) -> Result<PoolConfig, PoolError> {
    Ok(PoolConfig {
        admin: admin(env)?,
        staking_token: staking_token(env)?,
        reward_token: reward_token(env)?,
        reward_distributor: reward_distributor(env)?,
        treasury: treasury(env)?,
        reward_duration: reward_duration(env),
        operation_fee: operation_fee(env),
        min_claim_amount: min_claim_amount(env),
        withdraw_enabled: withdraw_enabled(env),
    })
}

// ── Addresses ───────────────────────────────────────────────────────────────

fn address(env: &Env, key: &Symbol) -> Result<Address, PoolError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(PoolError::NotInitialized)
}

pub fn admin(env: &Env) -> Result<Address, PoolError> {
    address(env, &ADMIN)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

pub fn set_pending_admin(env: &Env, candidate: &Address) {
    env.storage().instance().set(&PENDING_ADMIN, candidate);
}

pub fn clear_pending_admin(env: &Env) {
    env.storage().instance().remove(&PENDING_ADMIN);
}

pub fn staking_token(env: &Env) -> Result<Address, PoolError> {
    address(env, &STAKE_TOKEN)
}

pub fn set_staking_token(env: &Env, token: &Address) {
    env.storage().instance().set(&STAKE_TOKEN, token);
}

pub fn reward_token(env: &Env) -> Result<Address, PoolError> {
    address(env, &REWARD_TOKEN)
}

pub fn reward_distributor(env: &Env) -> Result<Address, PoolError> {
    address(env, &DISTRIBUTOR)
}

pub fn set_reward_distributor(env: &Env, distributor: &Address) {
    env.storage().instance().set(&DISTRIBUTOR, distributor);
}

pub fn treasury(env: &Env) -> Result<Address, PoolError> {
    address(env, &TREASURY)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&TREASURY, treasury);
}

// ── Policy knobs ────────────────────────────────────────────────────────────

pub fn reward_duration(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DURATION)
        .unwrap_or(DEFAULT_REWARD_DURATION)
}

pub fn operation_fee(env: &Env) -> i128 {
    env.storage().instance().get(&OPERATION_FEE).unwrap_or(0)
}

pub fn set_operation_fee(env: &Env, fee: i128) {
    env.storage().instance().set(&OPERATION_FEE, &fee);
}

pub fn min_claim_amount(env: &Env) -> i128 {
    env.storage().instance().get(&MIN_CLAIM).unwrap_or(0)
}

pub fn set_min_claim_amount(env: &Env, amount: i128) {
    env.storage().instance().set(&MIN_CLAIM, &amount);
}

pub fn withdraw_enabled(env: &Env) -> bool {
    env.storage().instance().get(&WITHDRAW_ON).unwrap_or(true)
}
