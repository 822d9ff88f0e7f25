use soroban_sdk::{token, Address, Env};

use crate::PoolError;

/// What the pool needs from a fungible token contract.
///
/// Every call reports through `PoolError`: a trapped invocation, a host
/// error or a return value that does not decode all surface as
/// `PoolError::Transfer`, so callers never deal with the token's own calling
/// convention.
pub trait FungibleToken {
    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), PoolError>;

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), PoolError>;

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<i128, PoolError>;

    fn balance(&self, id: &Address) -> Result<i128, PoolError>;
}

/// A token reached through the standard Soroban token interface.
pub struct TokenContract<'a> {
    client: token::Client<'a>,
}

impl<'a> TokenContract<'a> {
    pub fn new(env: &Env, address: &Address) -> Self {
        Self {
            client: token::Client::new(env, address),
        }
    }
}

/// Amounts reported by a token must be non-negative.
fn checked_amount(value: i128) -> Result<i128, PoolError> {
    if value < 0 {
        return Err(PoolError::Transfer);
    }
    Ok(value)
}

impl<'a> FungibleToken for TokenContract<'a> {
    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), PoolError> {
        match self.client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(PoolError::Transfer),
        }
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), PoolError> {
        match self.client.try_transfer_from(spender, from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(PoolError::Transfer),
        }
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<i128, PoolError> {
        match self.client.try_allowance(owner, spender) {
            Ok(Ok(value)) => checked_amount(value),
            _ => Err(PoolError::Transfer),
        }
    }

    fn balance(&self, id: &Address) -> Result<i128, PoolError> {
        match self.client.try_balance(id) {
            Ok(Ok(value)) => checked_amount(value),
            _ => Err(PoolError::Transfer),
        }
    }
}
