//! Access grant ledger: one row per (patient, doctor) pair.
//!
//! A row starts ungranted when either side opens it, becomes granted when the
//! patient approves, and drops back to ungranted on revoke. Expiry is never
//! swept; it is evaluated by the gate every time a grant is read.

use medchain_common::{extend_persistent, newest_first, remove_item};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::audit::{self, AccessAction};
use crate::{config, events, identity, ContractError};

const ACCESS: Symbol = symbol_short!("ACCESS");
const PATIENT_GRANTS: Symbol = symbol_short!("PAT_GRT");
const DOCTOR_GRANTS: Symbol = symbol_short!("DOC_GRT");

/// Access grant structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrant {
    pub patient: Address,
    pub doctor: Address,
    pub granted: bool,
    pub granted_at: Option<u64>,
    pub expires_at: Option<u64>,
    pub revoked_at: Option<u64>,
    pub created_at: u64,
}

impl AccessGrant {
    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }

    /// Granted and not yet expired at `now`.
    pub fn is_active(&self, now: u64) -> bool {
        self.granted && !self.is_expired(now)
    }
}

fn access_key(patient: &Address, doctor: &Address) -> (Symbol, Address, Address) {
    (ACCESS, patient.clone(), doctor.clone())
}

fn patient_grants_key(patient: &Address) -> (Symbol, Address) {
    (PATIENT_GRANTS, patient.clone())
}

fn doctor_grants_key(doctor: &Address) -> (Symbol, Address) {
    (DOCTOR_GRANTS, doctor.clone())
}

fn load_index(env: &Env, key: &(Symbol, Address)) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or(Vec::new(env))
}

fn push_index(env: &Env, key: &(Symbol, Address), address: &Address) {
    let mut addresses = load_index(env, key);
    addresses.push_back(address.clone());
    env.storage().persistent().set(key, &addresses);
    extend_persistent(env, key);
}

fn drop_from_index(env: &Env, key: &(Symbol, Address), address: &Address) {
    let mut addresses = load_index(env, key);
    if remove_item(&mut addresses, address) {
        env.storage().persistent().set(key, &addresses);
    }
}

fn store_grant(env: &Env, grant: &AccessGrant) {
    let key = access_key(&grant.patient, &grant.doctor);
    env.storage().persistent().set(&key, grant);
    extend_persistent(env, &key);
}

/// Reads the row straight from storage. Nothing here is cached.
pub fn load_grant(env: &Env, patient: &Address, doctor: &Address) -> Option<AccessGrant> {
    env.storage().persistent().get(&access_key(patient, doctor))
}

/// Creates an ungranted row unless one already exists in any state.
/// Returns whether a row was created.
fn open_row(env: &Env, patient: &Address, doctor: &Address) -> bool {
    if load_grant(env, patient, doctor).is_some() {
        return false;
    }
    let grant = AccessGrant {
        patient: patient.clone(),
        doctor: doctor.clone(),
        granted: false,
        granted_at: None,
        expires_at: None,
        revoked_at: None,
        created_at: env.ledger().timestamp(),
    };
    store_grant(env, &grant);
    push_index(env, &patient_grants_key(patient), doctor);
    push_index(env, &doctor_grants_key(doctor), patient);
    true
}

/// Doctor-initiated request. Idempotent on the row, but every call is audited.
pub fn request_access(
    env: &Env,
    doctor: Address,
    patient: Address,
) -> Result<AccessGrant, ContractError> {
    config::require_initialized(env)?;
    doctor.require_auth();
    identity::require_doctor(env, &doctor)?;
    identity::require_patient(env, &patient)?;

    let created = open_row(env, &patient, &doctor);
    audit::append(env, &doctor, &patient, AccessAction::AccessRequested, None, None);
    events::publish_access_requested(env, patient.clone(), doctor.clone(), doctor.clone(), created);

    load_grant(env, &patient, &doctor).ok_or(ContractError::StorageUnavailable)
}

/// Patient-initiated invitation. Same row semantics as `request_access`.
pub fn invite_doctor(
    env: &Env,
    patient: Address,
    doctor: Address,
) -> Result<AccessGrant, ContractError> {
    config::require_initialized(env)?;
    patient.require_auth();
    identity::require_patient(env, &patient)?;
    identity::require_doctor(env, &doctor)?;

    let created = open_row(env, &patient, &doctor);
    audit::append(env, &patient, &patient, AccessAction::AccessInvited, Some(&doctor), None);
    events::publish_access_requested(env, patient.clone(), doctor.clone(), patient.clone(), created);

    load_grant(env, &patient, &doctor).ok_or(ContractError::StorageUnavailable)
}

/// Approves a doctor. Only the owning patient may call it. An `expires_at`
/// already in the past is stored as given; the gate will deny on it.
pub fn grant(
    env: &Env,
    caller: Address,
    patient: Address,
    doctor: Address,
    expires_at: Option<u64>,
) -> Result<AccessGrant, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    if caller != patient {
        return Err(ContractError::Forbidden);
    }
    identity::require_patient(env, &patient)?;
    identity::require_doctor(env, &doctor)?;

    let now = env.ledger().timestamp();
    let max_duration = config::get_config(env).max_grant_duration_seconds;
    if let Some(expires_at) = expires_at {
        if max_duration > 0 && expires_at > now.saturating_add(max_duration) {
            return Err(ContractError::InvalidInput);
        }
    }

    open_row(env, &patient, &doctor);
    let mut grant = load_grant(env, &patient, &doctor).ok_or(ContractError::StorageUnavailable)?;
    grant.granted = true;
    grant.granted_at = Some(now);
    grant.expires_at = expires_at;
    grant.revoked_at = None;
    store_grant(env, &grant);

    audit::append(env, &patient, &patient, AccessAction::Grant, Some(&doctor), None);
    events::publish_access_granted(env, patient, doctor, expires_at);
    Ok(grant)
}

/// Withdraws a grant. `granted_at` is kept for history.
pub fn revoke(
    env: &Env,
    caller: Address,
    patient: Address,
    doctor: Address,
) -> Result<AccessGrant, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    if caller != patient {
        return Err(ContractError::Forbidden);
    }

    let mut grant = load_grant(env, &patient, &doctor).ok_or(ContractError::NotFound)?;
    grant.granted = false;
    grant.revoked_at = Some(env.ledger().timestamp());
    store_grant(env, &grant);

    audit::append(env, &patient, &patient, AccessAction::Revoke, Some(&doctor), None);
    events::publish_access_revoked(env, patient, doctor);
    Ok(grant)
}

fn load_grants(
    env: &Env,
    owner_key: &(Symbol, Address),
    row: impl Fn(&Address) -> (Address, Address),
    offset: u32,
    limit: u32,
) -> Result<Vec<AccessGrant>, ContractError> {
    let counterparts = load_index(env, owner_key);
    let mut grants = Vec::new(env);
    for other in newest_first(env, &counterparts, offset, config::page_limit(env, limit)).iter() {
        let (patient, doctor) = row(&other);
        let grant =
            load_grant(env, &patient, &doctor).ok_or(ContractError::StorageUnavailable)?;
        grants.push_back(grant);
    }
    Ok(grants)
}

/// Every row naming `patient`, pending requests included. Newest first.
pub fn list_patient_grants(
    env: &Env,
    patient: Address,
    offset: u32,
    limit: u32,
) -> Result<Vec<AccessGrant>, ContractError> {
    config::require_initialized(env)?;
    let key = patient_grants_key(&patient);
    load_grants(env, &key, |doctor| (patient.clone(), doctor.clone()), offset, limit)
}

/// Every row naming `doctor`. Newest first.
pub fn list_doctor_grants(
    env: &Env,
    doctor: Address,
    offset: u32,
    limit: u32,
) -> Result<Vec<AccessGrant>, ContractError> {
    config::require_initialized(env)?;
    let key = doctor_grants_key(&doctor);
    load_grants(env, &key, |patient| (patient.clone(), doctor.clone()), offset, limit)
}

/// Deletes every row naming `patient`.
pub fn purge_patient(env: &Env, patient: &Address) {
    let key = patient_grants_key(patient);
    for doctor in load_index(env, &key).iter() {
        env.storage().persistent().remove(&access_key(patient, &doctor));
        drop_from_index(env, &doctor_grants_key(&doctor), patient);
    }
    env.storage().persistent().remove(&key);
}

/// Deletes every row naming `doctor`.
pub fn purge_doctor(env: &Env, doctor: &Address) {
    let key = doctor_grants_key(doctor);
    for patient in load_index(env, &key).iter() {
        env.storage().persistent().remove(&access_key(&patient, doctor));
        drop_from_index(env, &patient_grants_key(&patient), doctor);
    }
    env.storage().persistent().remove(&key);
}
