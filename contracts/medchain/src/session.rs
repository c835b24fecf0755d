//! Login sessions. Wallet signatures are checked by the host through
//! `require_auth`; a session only records who signed in and until when.

use medchain_common::extend_persistent;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::identity::{self, Role};
use crate::{config, events, ContractError};

const SESSION: Symbol = symbol_short!("SESSION");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub user: Address,
    pub role: Role,
    pub issued_at: u64,
    pub expires_at: u64,
}

fn session_key(user: &Address) -> (Symbol, Address) {
    (SESSION, user.clone())
}

pub fn login(env: &Env, wallet: Address) -> Result<Session, ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    let user = identity::load_user(env, &wallet).ok_or(ContractError::NotFound)?;
    let now = env.ledger().timestamp();
    let session = Session {
        user: wallet.clone(),
        role: user.role,
        issued_at: now,
        expires_at: now.saturating_add(config::get_config(env).session_ttl_seconds),
    };
    let key = session_key(&wallet);
    env.storage().persistent().set(&key, &session);
    extend_persistent(env, &key);

    events::publish_login(env, wallet, session.expires_at);
    Ok(session)
}

/// The current session, or `None` once it has expired.
pub fn get_session(env: &Env, wallet: Address) -> Option<Session> {
    let session: Session = env.storage().persistent().get(&session_key(&wallet))?;
    if session.expires_at <= env.ledger().timestamp() {
        return None;
    }
    Some(session)
}

pub fn end_session(env: &Env, wallet: Address) -> Result<(), ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();
    clear(env, &wallet);
    Ok(())
}

pub(crate) fn clear(env: &Env, wallet: &Address) {
    env.storage().persistent().remove(&session_key(wallet));
}
