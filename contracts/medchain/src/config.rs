use medchain_common::{clamp_limit, extend_instance};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{events, ContractError};

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

pub const DEFAULT_MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400; // 24 hours

/// Runtime configuration, stored in instance storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractConfig {
    /// Upper bound on `limit` for every paginated read
    pub max_page_size: u32,
    /// Lifetime of a login session
    pub session_ttl_seconds: u64,
    /// Furthest allowed grant expiry, relative to now. Zero disables the check.
    pub max_grant_duration_seconds: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            max_grant_duration_seconds: 0,
        }
    }
}

fn validate_config(config: &ContractConfig) -> Result<(), ContractError> {
    if config.max_page_size == 0 || config.session_ttl_seconds == 0 {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if !is_initialized(env) {
        return Err(ContractError::NotInitialized);
    }
    extend_instance(env);
    Ok(())
}

pub fn initialize(env: &Env, admin: Address, config: ContractConfig) -> Result<(), ContractError> {
    if is_initialized(env) {
        return Err(ContractError::AlreadyInitialized);
    }
    admin.require_auth();
    validate_config(&config)?;

    env.storage().instance().set(&ADMIN, &admin);
    env.storage().instance().set(&CONFIG, &config);
    env.storage().instance().set(&INITIALIZED, &true);
    extend_instance(env);

    events::publish_initialized(env, admin);
    Ok(())
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(ContractError::NotInitialized)
}

pub fn is_admin(env: &Env, address: &Address) -> bool {
    get_admin(env).map(|admin| admin == *address).unwrap_or(false)
}

pub fn get_config(env: &Env) -> ContractConfig {
    env.storage()
        .instance()
        .get(&CONFIG)
        .unwrap_or_default()
}

pub fn set_config(env: &Env, caller: Address, config: ContractConfig) -> Result<(), ContractError> {
    require_initialized(env)?;
    caller.require_auth();
    if !is_admin(env, &caller) {
        return Err(ContractError::Forbidden);
    }
    validate_config(&config)?;

    env.storage().instance().set(&CONFIG, &config);
    events::publish_config_updated(env, caller, config);
    Ok(())
}

/// Caps a caller-supplied page size at the configured maximum.
pub fn page_limit(env: &Env, limit: u32) -> u32 {
    clamp_limit(limit, get_config(env).max_page_size)
}
