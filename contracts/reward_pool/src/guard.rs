use soroban_sdk::{log, symbol_short, Env, Symbol};

use crate::PoolError;

pub(crate) const LOCKED: Symbol = symbol_short!("LOCKED");

/// Returns `true` while a guarded call is executing.
pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().get(&LOCKED).unwrap_or(false)
}

fn set_locked(env: &Env, locked: bool) {
    env.storage().instance().set(&LOCKED, &locked);
}

/// Scoped hold on the pool's reentrancy flag.
///
/// `enter` flips the flag from idle to busy and hands back the guard; the
/// flag goes back to idle when the guard is released with [`exit`] or simply
/// dropped, so `?` early returns cannot leave the pool locked.
///
/// [`exit`]: ReentrancyGuard::exit
pub struct ReentrancyGuard {
    env: Env,
    released: bool,
}

impl ReentrancyGuard {
    pub fn enter(env: &Env) -> Result<Self, PoolError> {
        if is_locked(env) {
            log!(env, "reentrant call rejected");
            return Err(PoolError::Reentrancy);
        }
        set_locked(env, true);

        Ok(Self {
            env: env.clone(),
            released: false,
        })
    }

    /// Release explicitly, checking the flag is still held.
    ///
    /// An idle flag here means something cleared it behind the guard's back.
    pub fn exit(mut self) -> Result<(), PoolError> {
        self.released = true;
        if !is_locked(&self.env) {
            return Err(PoolError::Invariant);
        }
        set_locked(&self.env, false);
        Ok(())
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        if !self.released {
            set_locked(&self.env, false);
        }
    }
}
