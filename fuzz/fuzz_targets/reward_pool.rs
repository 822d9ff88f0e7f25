#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_pool::{PoolSettings, RewardPoolContract, RewardPoolContractClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u32 },
    Withdraw { user: u8, amount: u32 },
    Claim { user: u8 },
    Exit { user: u8 },
    Notify { amount: u32 },
    Advance { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let staking_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let pool_id = env.register(RewardPoolContract, ());
    let client = RewardPoolContractClient::new(&env, &pool_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &staking_token,
        &reward_token,
        &admin,
        &PoolSettings::default(),
    );

    let users: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let staking = StellarAssetClient::new(&env, &staking_token);
    let rewards = StellarAssetClient::new(&env, &reward_token);

    let mut now = 0u64;
    let mut funded = 0i128;
    let mut last_rpt = 0i128;

    for action in actions {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let staker = &users[user as usize % users.len()];
                let amount = amount as i128;
                staking.mint(staker, &amount);
                TokenClient::new(&env, &staking_token).approve(staker, &pool_id, &amount, &1_000);
                let _ = client.try_deposit(staker, &amount);
            }
            FuzzAction::Withdraw { user, amount } => {
                let staker = &users[user as usize % users.len()];
                let _ = client.try_withdraw(staker, &(amount as i128));
            }
            FuzzAction::Claim { user } => {
                let _ = client.try_claim(&users[user as usize % users.len()]);
            }
            FuzzAction::Exit { user } => {
                let _ = client.try_exit(&users[user as usize % users.len()]);
            }
            FuzzAction::Notify { amount } => {
                let amount = amount as i128;
                rewards.mint(&admin, &amount);
                if client.try_notify_reward_amount(&admin, &amount).is_ok() {
                    funded += amount;
                }
            }
            FuzzAction::Advance { seconds } => {
                now = now.saturating_add(seconds as u64);
                env.ledger().set_timestamp(now);
            }
        }

        // Ledger, accumulator and funding invariants must hold after every step.
        let total: i128 = users.iter().map(|u| client.balance_of(u)).sum();
        assert_eq!(client.total_staked(), total);
        assert!(!client.is_locked());

        let rpt = client.get_pool_state().reward_per_token_stored;
        assert!(rpt >= last_rpt);
        last_rpt = rpt;

        let owed: i128 = users
            .iter()
            .map(|u| client.earned(u) + client.lifetime_reward(u))
            .sum();
        assert!(owed <= funded);
    }
});
