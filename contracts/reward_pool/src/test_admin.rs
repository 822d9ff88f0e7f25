extern crate std;

use soroban_sdk::{
    testutils::{storage::Instance as _, Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address,
};

use crate::config::{TTL_EXTEND_TO, TTL_THRESHOLD};
use crate::test::setup;
use crate::PoolError;

// ── Configuration setters ────────────────────────────────────────────────────

#[test]
fn test_setters_require_admin() {
    let pool = setup();
    let outsider = Address::generate(&pool.env);

    let results = [
        pool.client.try_set_reward_distributor(&outsider, &outsider).err(),
        pool.client.try_set_staking_token(&outsider, &outsider).err(),
        pool.client.try_set_treasury(&outsider, &outsider).err(),
        pool.client.try_set_operation_fee(&outsider, &1).err(),
        pool.client.try_set_min_claim_amount(&outsider, &1).err(),
    ];
    for result in results {
        match result {
            Some(Ok(e)) => assert_eq!(e, PoolError::Unauthorized),
            _ => unreachable!("Expected Unauthorized error"),
        }
    }
}

#[test]
fn test_new_distributor_funds_windows() {
    let pool = setup();
    let distributor = Address::generate(&pool.env);

    pool.client.set_reward_distributor(&pool.admin, &distributor);
    assert_eq!(pool.client.get_config().reward_distributor, distributor);

    StellarAssetClient::new(&pool.env, &pool.reward_token).mint(&distributor, &172_800);
    pool.client.notify_reward_amount(&distributor, &172_800);
    assert_eq!(pool.client.reward_rate(), 1);

    // The admin no longer holds the distributor role.
    StellarAssetClient::new(&pool.env, &pool.reward_token).mint(&pool.admin, &172_800);
    match pool.client.try_notify_reward_amount(&pool.admin, &172_800) {
        Err(Ok(e)) => assert_eq!(e, PoolError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_set_treasury_and_fees() {
    let pool = setup();
    let treasury = Address::generate(&pool.env);

    pool.client.set_treasury(&pool.admin, &treasury);
    pool.client.set_operation_fee(&pool.admin, &25);
    pool.client.set_min_claim_amount(&pool.admin, &1_000);

    let config = pool.client.get_config();
    assert_eq!(config.treasury, treasury);
    assert_eq!(config.operation_fee, 25);
    assert_eq!(config.min_claim_amount, 1_000);
}

#[test]
fn test_negative_fee_or_threshold_rejected() {
    let pool = setup();

    match pool.client.try_set_operation_fee(&pool.admin, &-1) {
        Err(Ok(e)) => assert_eq!(e, PoolError::InvalidConfig),
        _ => unreachable!("Expected InvalidConfig error"),
    }
    match pool.client.try_set_min_claim_amount(&pool.admin, &-1) {
        Err(Ok(e)) => assert_eq!(e, PoolError::InvalidConfig),
        _ => unreachable!("Expected InvalidConfig error"),
    }
}

#[test]
fn test_staking_token_change_needs_empty_pool() {
    let pool = setup();
    let staker = Address::generate(&pool.env);
    let replacement = pool
        .env
        .register_stellar_asset_contract_v2(Address::generate(&pool.env))
        .address();

    pool.stake(&staker, 1_000);
    match pool.client.try_set_staking_token(&pool.admin, &replacement) {
        Err(Ok(e)) => assert_eq!(e, PoolError::PoolNotEmpty),
        _ => unreachable!("Expected PoolNotEmpty error"),
    }

    pool.client.exit(&staker);
    pool.client.set_staking_token(&pool.admin, &replacement);
    assert_eq!(pool.client.get_config().staking_token, replacement);
}

#[test]
fn test_staking_token_cannot_be_reward_asset() {
    let pool = setup();

    match pool.client.try_set_staking_token(&pool.admin, &pool.reward_token) {
        Err(Ok(e)) => assert_eq!(e, PoolError::TokensIdentical),
        _ => unreachable!("Expected TokensIdentical error"),
    }
}

#[test]
fn test_setter_extends_instance_ttl() {
    let pool = setup();
    let instance_ttl = || pool.env.as_contract(&pool.id, || pool.env.storage().instance().get_ttl());

    pool.env.ledger().with_mut(|li| li.sequence_number += 600_000);
    assert!(instance_ttl() < TTL_THRESHOLD);

    pool.client.set_operation_fee(&pool.admin, &5);
    assert_eq!(instance_ttl(), TTL_EXTEND_TO);
}

// ── Asset recovery ───────────────────────────────────────────────────────────

#[test]
fn test_recover_foreign_asset_sweeps_to_admin() {
    let pool = setup();
    let stray = pool
        .env
        .register_stellar_asset_contract_v2(Address::generate(&pool.env))
        .address();
    StellarAssetClient::new(&pool.env, &stray).mint(&pool.id, &5_000);

    assert_eq!(pool.client.recover_foreign_asset(&pool.admin, &stray), 5_000);

    let token = TokenClient::new(&pool.env, &stray);
    assert_eq!(token.balance(&pool.admin), 5_000);
    assert_eq!(token.balance(&pool.id), 0);
}

#[test]
fn test_recover_refuses_managed_assets() {
    let pool = setup();
    let staker = Address::generate(&pool.env);
    pool.stake(&staker, 1_000);

    for managed in [&pool.staking_token, &pool.reward_token] {
        match pool.client.try_recover_foreign_asset(&pool.admin, managed) {
            Err(Ok(e)) => assert_eq!(e, PoolError::ProtectedAsset),
            _ => unreachable!("Expected ProtectedAsset error"),
        }
    }
    assert_eq!(pool.staking_balance(&pool.id), 1_000);
}

#[test]
fn test_recover_requires_admin() {
    let pool = setup();
    let outsider = Address::generate(&pool.env);
    let stray = pool
        .env
        .register_stellar_asset_contract_v2(Address::generate(&pool.env))
        .address();

    match pool.client.try_recover_foreign_asset(&outsider, &stray) {
        Err(Ok(e)) => assert_eq!(e, PoolError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

// ── Admin transfer ───────────────────────────────────────────────────────────

#[test]
fn test_two_step_admin_transfer() {
    let pool = setup();
    let successor = Address::generate(&pool.env);

    pool.client.propose_admin(&pool.admin, &successor);
    assert_eq!(pool.client.get_pending_admin(), Some(successor.clone()));
    assert_eq!(pool.client.get_admin(), pool.admin);

    pool.client.accept_admin(&successor);
    assert_eq!(pool.client.get_admin(), successor);
    assert_eq!(pool.client.get_pending_admin(), None);

    // The old admin lost its rights.
    match pool.client.try_set_operation_fee(&pool.admin, &1) {
        Err(Ok(e)) => assert_eq!(e, PoolError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_accept_admin_by_wrong_address_fails() {
    let pool = setup();
    let successor = Address::generate(&pool.env);
    let impostor = Address::generate(&pool.env);

    pool.client.propose_admin(&pool.admin, &successor);
    match pool.client.try_accept_admin(&impostor) {
        Err(Ok(e)) => assert_eq!(e, PoolError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_accept_without_proposal_fails() {
    let pool = setup();
    let someone = Address::generate(&pool.env);

    match pool.client.try_accept_admin(&someone) {
        Err(Ok(e)) => assert_eq!(e, PoolError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_cancel_admin_transfer() {
    let pool = setup();
    let successor = Address::generate(&pool.env);

    pool.client.propose_admin(&pool.admin, &successor);
    pool.client.cancel_admin_transfer(&pool.admin);
    assert_eq!(pool.client.get_pending_admin(), None);

    match pool.client.try_accept_admin(&successor) {
        Err(Ok(e)) => assert_eq!(e, PoolError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}
