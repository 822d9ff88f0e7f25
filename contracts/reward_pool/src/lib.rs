#![no_std]

pub mod config;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod period;
pub mod rewards;
pub mod token;

use soroban_sdk::{contract, contractimpl, log, Address, Env};

pub use config::{PoolConfig, PoolSettings};
pub use guard::ReentrancyGuard;
pub use ledger::{Account, PoolState};

use ledger::Payout;
use token::{FungibleToken, TokenContract};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    Allowance = 6,
    InsufficientFunds = 7,
    Transfer = 8,
    Reentrancy = 9,
    Invariant = 10,
    TokensIdentical = 11,
    ProtectedAsset = 12,
    WithdrawDisabled = 13,
    NoPendingAdmin = 14,
    InvalidConfig = 15,
    PoolNotEmpty = 16,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardPoolContract;

#[contractimpl]
impl RewardPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `staking_token` – token users deposit.
    /// * `reward_token`  – asset paid out as reward (the native asset
    ///   contract in production).
    /// * `treasury`      – receives the operation fee on each payout.
    ///
    /// The admin is also the initial reward distributor.
    pub fn initialize(
        env: Env,
        admin: Address,
        staking_token: Address,
        reward_token: Address,
        treasury: Address,
        settings: PoolSettings,
    ) -> Result<(), PoolError> {
        if config::is_initialized(&env) {
            return Err(PoolError::AlreadyInitialized);
        }
        if staking_token == reward_token {
            return Err(PoolError::TokensIdentical);
        }
        settings.validate()?;

        config::store_initial(
            &env,
            &admin,
            &staking_token,
            &reward_token,
            &treasury,
            &settings,
        );
        ledger::save_pool(&env, &PoolState::default());

        events::publish_initialized(
            &env,
            admin,
            staking_token,
            reward_token,
            treasury,
            settings.reward_duration,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens.
    ///
    /// The staker must have approved the pool for at least `amount`. The
    /// checkpoint runs before the balance grows, so the new tokens earn
    /// nothing retroactively.
    pub fn deposit(env: Env, staker: Address, amount: i128) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        staker.require_auth();
        let guard = ReentrancyGuard::enter(&env)?;

        let now = env.ledger().timestamp();
        let mut pool = ledger::load_pool(&env);
        let mut account = ledger::load_account(&env, &staker);
        rewards::checkpoint(&mut pool, Some(&mut account), now);

        if amount <= 0 {
            return Err(PoolError::InvalidAmount);
        }

        // Pull the tokens in through the staker's allowance.
        let pool_address = env.current_contract_address();
        let staking_token = TokenContract::new(&env, &config::staking_token(&env)?);
        if staking_token.allowance(&staker, &pool_address)? < amount {
            return Err(PoolError::Allowance);
        }
        staking_token.transfer_from(&pool_address, &staker, &pool_address, amount)?;

        ledger::credit(&mut pool, &mut account, amount);
        ledger::save_account(&env, &staker, &account);
        ledger::save_pool(&env, &pool);
        config::extend_instance_ttl(&env);

        events::publish_staked(&env, staker, amount, pool.total_staked);

        guard.exit()
    }

    /// Withdraw `amount` staking tokens, paying out accrued reward first.
    ///
    /// Fails with `WithdrawDisabled` on pools created with permanent deposits.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        staker.require_auth();
        let guard = ReentrancyGuard::enter(&env)?;

        if !config::withdraw_enabled(&env) {
            return Err(PoolError::WithdrawDisabled);
        }
        if amount <= 0 {
            return Err(PoolError::InvalidAmount);
        }

        Self::withdraw_and_pay(&env, &staker, Some(amount))?;

        guard.exit()
    }

    /// Claim all accrued reward.
    ///
    /// Returns the gross amount settled, fee included. Zero means nothing
    /// was paid: either nothing has accrued, or the accrued amount is still
    /// below the claim threshold or the operation fee and stays owed.
    pub fn claim(env: Env, staker: Address) -> Result<i128, PoolError> {
        config::require_initialized(&env)?;
        staker.require_auth();
        let guard = ReentrancyGuard::enter(&env)?;

        let now = env.ledger().timestamp();
        let mut pool = ledger::load_pool(&env);
        let mut account = ledger::load_account(&env, &staker);
        rewards::checkpoint(&mut pool, Some(&mut account), now);

        let payout = Self::take_payout(&env, &mut account);

        // Effects before the transfer.
        ledger::save_account(&env, &staker, &account);
        ledger::save_pool(&env, &pool);
        config::extend_instance_ttl(&env);

        let paid = match payout {
            Some(payout) => {
                Self::deliver_reward(&env, &staker, &payout)?;
                payout.gross
            }
            None => 0,
        };

        guard.exit()?;
        Ok(paid)
    }

    /// Withdraw the whole stake and claim in a single call.
    ///
    /// Returns the gross reward paid, as `claim` does.
    pub fn exit(env: Env, staker: Address) -> Result<i128, PoolError> {
        config::require_initialized(&env)?;
        staker.require_auth();
        let guard = ReentrancyGuard::enter(&env)?;

        if !config::withdraw_enabled(&env) {
            return Err(PoolError::WithdrawDisabled);
        }

        let paid = Self::withdraw_and_pay(&env, &staker, None)?;

        guard.exit()?;
        Ok(paid)
    }

    // ── Reward funding ──────────────────────────────────────────────────────

    /// Fund a new distribution window with `amount` of the reward asset.
    ///
    /// The distributor's funds are pulled in by this call. A top-up during an
    /// active window rolls the unspent remainder into the new rate. Fails
    /// with `InsufficientFunds` when the distributor cannot cover `amount`
    /// or the pool could not pay the resulting rate for a full window.
    pub fn notify_reward_amount(
        env: Env,
        distributor: Address,
        amount: i128,
    ) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        distributor.require_auth();
        Self::require_distributor(&env, &distributor)?;
        let guard = ReentrancyGuard::enter(&env)?;

        if amount <= 0 {
            return Err(PoolError::InvalidAmount);
        }

        let pool_address = env.current_contract_address();
        let reward_asset = TokenContract::new(&env, &config::reward_token(&env)?);
        if reward_asset.balance(&distributor)? < amount {
            return Err(PoolError::InsufficientFunds);
        }
        reward_asset.transfer(&distributor, &pool_address, amount)?;

        let now = env.ledger().timestamp();
        let duration = config::reward_duration(&env);
        let mut pool = ledger::load_pool(&env);
        period::notify_new_reward(&mut pool, amount, now, duration);

        let committed = pool.reward_rate.saturating_mul(duration as i128);
        if committed > reward_asset.balance(&pool_address)? {
            return Err(PoolError::InsufficientFunds);
        }

        ledger::save_pool(&env, &pool);
        config::extend_instance_ttl(&env);

        log!(
            &env,
            "reward window opened",
            pool.reward_rate,
            pool.period_finish
        );
        events::publish_reward_added(&env, amount, pool.reward_rate, pool.period_finish);

        guard.exit()
    }

    // ── Asset recovery ──────────────────────────────────────────────────────

    /// Sweep the pool's whole balance of a stray `token` to the admin.
    ///
    /// The staking token and the reward asset are refused: those balances
    /// back user deposits and owed rewards.
    pub fn recover_foreign_asset(
        env: Env,
        caller: Address,
        token: Address,
    ) -> Result<i128, PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        let guard = ReentrancyGuard::enter(&env)?;

        if token == config::staking_token(&env)? || token == config::reward_token(&env)? {
            return Err(PoolError::ProtectedAsset);
        }

        let pool_address = env.current_contract_address();
        let foreign = TokenContract::new(&env, &token);
        let amount = foreign.balance(&pool_address)?;
        if amount > 0 {
            foreign.transfer(&pool_address, &caller, amount)?;
        }

        config::extend_instance_ttl(&env);

        events::publish_recovered(&env, token, caller, amount);

        guard.exit()?;
        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` could claim right now. Never mutates state.
    pub fn earned(env: Env, staker: Address) -> i128 {
        let pool = ledger::load_pool(&env);
        let account = ledger::load_account(&env, &staker);
        rewards::earned_at(&pool, &account, env.ledger().timestamp())
    }

    pub fn balance_of(env: Env, staker: Address) -> i128 {
        ledger::load_account(&env, &staker).balance
    }

    pub fn lifetime_reward(env: Env, staker: Address) -> i128 {
        ledger::load_account(&env, &staker).lifetime_reward
    }

    pub fn get_account(env: Env, staker: Address) -> Account {
        ledger::load_account(&env, &staker)
    }

    pub fn total_staked(env: Env) -> i128 {
        ledger::load_pool(&env).total_staked
    }

    /// Current accumulator value, as if refreshed now.
    pub fn reward_per_token(env: Env) -> i128 {
        rewards::reward_per_token(&ledger::load_pool(&env), env.ledger().timestamp())
    }

    pub fn last_time_reward_applicable(env: Env) -> u64 {
        period::last_time_reward_applicable(
            env.ledger().timestamp(),
            ledger::load_pool(&env).period_finish,
        )
    }

    pub fn reward_rate(env: Env) -> i128 {
        ledger::load_pool(&env).reward_rate
    }

    pub fn period_finish(env: Env) -> u64 {
        ledger::load_pool(&env).period_finish
    }

    /// Stored pool state, without the refresh `reward_per_token` applies.
    pub fn get_pool_state(env: Env) -> PoolState {
        ledger::load_pool(&env)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, PoolError> {
        config::snapshot(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn is_locked(env: Env) -> bool {
        guard::is_locked(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, PoolError> {
        config::admin(&env)
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        config::pending_admin(&env)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin. The candidate completes the handover with
    /// `accept_admin`.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        config::set_pending_admin(&env, &new_admin);
        config::extend_instance_ttl(&env);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        new_admin.require_auth();

        let pending = config::pending_admin(&env).ok_or(PoolError::NoPendingAdmin)?;
        if new_admin != pending {
            return Err(PoolError::Unauthorized);
        }

        let old_admin = config::admin(&env)?;
        config::set_admin(&env, &new_admin);
        config::clear_pending_admin(&env);
        config::extend_instance_ttl(&env);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending = config::pending_admin(&env).ok_or(PoolError::NoPendingAdmin)?;
        config::clear_pending_admin(&env);
        config::extend_instance_ttl(&env);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Hand the right to fund reward windows to `distributor`.
    pub fn set_reward_distributor(
        env: Env,
        caller: Address,
        distributor: Address,
    ) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        config::set_reward_distributor(&env, &distributor);
        config::extend_instance_ttl(&env);

        events::publish_distributor_set(&env, distributor);

        Ok(())
    }

    /// Point the pool at a different staking token.
    ///
    /// Only allowed while nothing is staked: existing balances are
    /// denominated in the old token.
    pub fn set_staking_token(env: Env, caller: Address, token: Address) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if ledger::load_pool(&env).total_staked > 0 {
            return Err(PoolError::PoolNotEmpty);
        }
        if token == config::reward_token(&env)? {
            return Err(PoolError::TokensIdentical);
        }

        config::set_staking_token(&env, &token);
        config::extend_instance_ttl(&env);

        events::publish_staking_token_set(&env, token);

        Ok(())
    }

    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        config::set_treasury(&env, &treasury);
        config::extend_instance_ttl(&env);

        events::publish_treasury_set(&env, treasury);

        Ok(())
    }

    /// Set the flat fee taken from each reward payout.
    pub fn set_operation_fee(env: Env, caller: Address, fee: i128) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if fee < 0 {
            return Err(PoolError::InvalidConfig);
        }

        config::set_operation_fee(&env, fee);
        config::extend_instance_ttl(&env);

        events::publish_operation_fee_set(&env, fee);

        Ok(())
    }

    /// Set the smallest accrued reward that `claim` will pay out.
    pub fn set_min_claim_amount(env: Env, caller: Address, amount: i128) -> Result<(), PoolError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if amount < 0 {
            return Err(PoolError::InvalidConfig);
        }

        config::set_min_claim_amount(&env, amount);
        config::extend_instance_ttl(&env);

        events::publish_min_claim_set(&env, amount);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if `caller` is not the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), PoolError> {
        if *caller != config::admin(env)? {
            return Err(PoolError::Unauthorized);
        }
        Ok(())
    }

    fn require_distributor(env: &Env, caller: &Address) -> Result<(), PoolError> {
        if *caller != config::reward_distributor(env)? {
            return Err(PoolError::Unauthorized);
        }
        Ok(())
    }

    /// Apply the configured payout policy to `account`.
    fn take_payout(env: &Env, account: &mut Account) -> Option<Payout> {
        let payout = ledger::take_payout(
            account,
            config::min_claim_amount(env),
            config::operation_fee(env),
        );
        if payout.is_none() && account.accrued_reward > 0 {
            log!(env, "payout deferred", account.accrued_reward);
        }
        payout
    }

    /// Send a payout: net to the staker, fee to the treasury.
    fn deliver_reward(env: &Env, staker: &Address, payout: &Payout) -> Result<(), PoolError> {
        let pool_address = env.current_contract_address();
        let reward_asset = TokenContract::new(env, &config::reward_token(env)?);

        reward_asset.transfer(&pool_address, staker, payout.net)?;
        if payout.fee > 0 {
            reward_asset.transfer(&pool_address, &config::treasury(env)?, payout.fee)?;
        }

        events::publish_reward_paid(env, staker.clone(), payout.net, payout.fee);
        Ok(())
    }

    /// Shared body of `withdraw` and `exit`: checkpoint, pay out accrued
    /// reward, then return `amount` (the whole balance for `None`).
    ///
    /// Returns the gross reward paid.
    fn withdraw_and_pay(
        env: &Env,
        staker: &Address,
        amount: Option<i128>,
    ) -> Result<i128, PoolError> {
        let now = env.ledger().timestamp();
        let mut pool = ledger::load_pool(env);
        let mut account = ledger::load_account(env, staker);
        rewards::checkpoint(&mut pool, Some(&mut account), now);

        let amount = amount.unwrap_or(account.balance);
        let payout = Self::take_payout(env, &mut account);
        ledger::debit(&mut pool, &mut account, amount)?;

        // Effects before the transfers.
        ledger::save_account(env, staker, &account);
        ledger::save_pool(env, &pool);
        config::extend_instance_ttl(env);

        let paid = match payout {
            Some(payout) => {
                Self::deliver_reward(env, staker, &payout)?;
                payout.gross
            }
            None => 0,
        };

        if amount > 0 {
            let pool_address = env.current_contract_address();
            let staking_token = TokenContract::new(env, &config::staking_token(env)?);
            staking_token.transfer(&pool_address, staker, amount)?;

            events::publish_withdrawn(env, staker.clone(), amount, pool.total_staked);
        }

        Ok(paid)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
