//! Append-only access log.
//!
//! Entries are keyed by a global sequence number and indexed per patient and
//! per actor, one index key per entry. Nothing in this module updates or
//! removes an entry once it is written.

use medchain_common::{extend_persistent, newest_window, seq_get, seq_len, seq_push};
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::identity::{self, Role};
use crate::{config, events, ledger, validation, ContractError};

const AUDIT_COUNTER: Symbol = symbol_short!("AUD_CTR");
const AUDIT_ENTRY: Symbol = symbol_short!("AUD_ENT");
const AUDIT_BY_PATIENT: Symbol = symbol_short!("AUD_PAT");
const AUDIT_BY_ACTOR: Symbol = symbol_short!("AUD_ACT");

/// Closed vocabulary of access-relevant actions.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessAction {
    View,
    Deny,
    EmergencyAccess,
    AccessRequested,
    AccessInvited,
    Grant,
    Revoke,
    RecordAdded,
    DiagnosisAdded,
    RecordDeleted,
    ProfileUpdated,
    EmergencyReviewed,
    Note,
}

const ALL_ACTIONS: [AccessAction; 13] = [
    AccessAction::View,
    AccessAction::Deny,
    AccessAction::EmergencyAccess,
    AccessAction::AccessRequested,
    AccessAction::AccessInvited,
    AccessAction::Grant,
    AccessAction::Revoke,
    AccessAction::RecordAdded,
    AccessAction::DiagnosisAdded,
    AccessAction::RecordDeleted,
    AccessAction::ProfileUpdated,
    AccessAction::EmergencyReviewed,
    AccessAction::Note,
];

impl AccessAction {
    /// Wire tag of the action, as accepted by `record_access`.
    pub fn tag(&self) -> &'static str {
        match self {
            AccessAction::View => "view",
            AccessAction::Deny => "deny",
            AccessAction::EmergencyAccess => "emergency_access",
            AccessAction::AccessRequested => "access_requested",
            AccessAction::AccessInvited => "access_invited",
            AccessAction::Grant => "grant",
            AccessAction::Revoke => "revoke",
            AccessAction::RecordAdded => "record_added",
            AccessAction::DiagnosisAdded => "diagnosis_added",
            AccessAction::RecordDeleted => "record_deleted",
            AccessAction::ProfileUpdated => "profile_updated",
            AccessAction::EmergencyReviewed => "emergency_reviewed",
            AccessAction::Note => "note",
        }
    }

    /// Parses a tag against the vocabulary. Unknown tags are rejected.
    pub fn from_tag(env: &Env, tag: &Symbol) -> Result<AccessAction, ContractError> {
        ALL_ACTIONS
            .iter()
            .find(|action| Symbol::new(env, action.tag()) == *tag)
            .copied()
            .ok_or(ContractError::InvalidAction)
    }

    /// Actions some module writes as a side effect of its own operation.
    /// `record_access` refuses them.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, AccessAction::Note)
    }
}

/// Audit entry. Written once, never updated or deleted.
///
/// `counterparty` names the other side of a ledger or review action, such as
/// the doctor a patient granted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessLogEntry {
    pub id: u64,
    pub actor: Address,
    pub patient: Address,
    pub action: AccessAction,
    pub counterparty: Option<Address>,
    pub detail: Option<String>,
    pub timestamp: u64,
}

fn entry_key(id: u64) -> (Symbol, u64) {
    (AUDIT_ENTRY, id)
}

/// Appends an entry and returns its id. Callers pass a vocabulary value, so
/// this path cannot produce an unknown tag.
///
/// The entry is indexed under the patient and the actor, and under the
/// counterparty when there is one.
pub fn append(
    env: &Env,
    actor: &Address,
    patient: &Address,
    action: AccessAction,
    counterparty: Option<&Address>,
    detail: Option<String>,
) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&AUDIT_COUNTER)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&AUDIT_COUNTER, &id);

    let entry = AccessLogEntry {
        id,
        actor: actor.clone(),
        patient: patient.clone(),
        action,
        counterparty: counterparty.cloned(),
        detail,
        timestamp: env.ledger().timestamp(),
    };
    let key = entry_key(id);
    env.storage().persistent().set(&key, &entry);
    extend_persistent(env, &key);

    seq_push(env, &AUDIT_BY_PATIENT, patient, &id);
    seq_push(env, &AUDIT_BY_ACTOR, actor, &id);
    if let Some(other) = counterparty.filter(|other| *other != actor) {
        seq_push(env, &AUDIT_BY_ACTOR, other, &id);
    }

    events::publish_audit_appended(
        env,
        id,
        patient.clone(),
        actor.clone(),
        action,
        counterparty.cloned(),
    );
    id
}

/// External append path for annotations the contract does not write itself.
///
/// The actor must be the patient or a doctor holding an active grant from the
/// patient. Tags some module writes on its own are `Forbidden` here.
pub fn record(
    env: &Env,
    actor: Address,
    patient: Address,
    tag: Symbol,
    detail: Option<String>,
) -> Result<u64, ContractError> {
    config::require_initialized(env)?;
    actor.require_auth();

    let action = AccessAction::from_tag(env, &tag)?;
    if action.is_reserved() {
        return Err(ContractError::Forbidden);
    }
    if let Some(text) = &detail {
        validation::validate_detail(text)?;
    }
    let user = identity::load_user(env, &actor).ok_or(ContractError::NotFound)?;
    identity::require_patient(env, &patient)?;

    if actor != patient {
        let now = env.ledger().timestamp();
        let granted = user.role == Role::Doctor
            && ledger::load_grant(env, &patient, &actor).is_some_and(|grant| grant.is_active(now));
        if !granted {
            return Err(ContractError::Forbidden);
        }
    }

    Ok(append(env, &actor, &patient, action, None, detail))
}

pub fn get_entry(env: &Env, id: u64) -> Option<AccessLogEntry> {
    env.storage().persistent().get(&entry_key(id))
}

fn load_page(
    env: &Env,
    index: &Symbol,
    owner: &Address,
    limit: u32,
    offset: u32,
) -> Result<Vec<AccessLogEntry>, ContractError> {
    let len = seq_len(env, index, owner);
    let mut entries = Vec::new(env);
    for n in newest_window(len, offset, config::page_limit(env, limit)) {
        let entry = seq_get::<u64>(env, index, owner, n)
            .and_then(|id| get_entry(env, id))
            .ok_or(ContractError::StorageUnavailable)?;
        entries.push_back(entry);
    }
    Ok(entries)
}

/// Entries about `patient`, newest first. Readable by the patient or the admin.
pub fn query_by_patient(
    env: &Env,
    caller: Address,
    patient: Address,
    limit: u32,
    offset: u32,
) -> Result<Vec<AccessLogEntry>, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    if caller != patient && !config::is_admin(env, &caller) {
        return Err(ContractError::Forbidden);
    }
    load_page(env, &AUDIT_BY_PATIENT, &patient, limit, offset)
}

/// Entries written by `actor` or naming it as counterparty, newest first.
/// Readable by the actor or the admin.
pub fn query_by_actor(
    env: &Env,
    caller: Address,
    actor: Address,
    limit: u32,
    offset: u32,
) -> Result<Vec<AccessLogEntry>, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    if caller != actor && !config::is_admin(env, &caller) {
        return Err(ContractError::Forbidden);
    }
    load_page(env, &AUDIT_BY_ACTOR, &actor, limit, offset)
}

pub fn count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&AUDIT_COUNTER)
        .unwrap_or(0u64)
}

pub fn patient_count(env: &Env, patient: &Address) -> u32 {
    seq_len(env, &AUDIT_BY_PATIENT, patient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_vocabulary() {
        let env = Env::default();
        for action in ALL_ACTIONS.iter() {
            let tag = Symbol::new(&env, action.tag());
            assert_eq!(AccessAction::from_tag(&env, &tag), Ok(*action));
        }
    }

    #[test]
    fn test_unknown_tag_is_invalid_action() {
        let env = Env::default();
        for tag in ["delete_everything", "VIEW", "granted"] {
            assert_eq!(
                AccessAction::from_tag(&env, &Symbol::new(&env, tag)),
                Err(ContractError::InvalidAction)
            );
        }
    }

    #[test]
    fn test_reserved_actions() {
        assert!(AccessAction::Grant.is_reserved());
        assert!(AccessAction::Deny.is_reserved());
        for action in ALL_ACTIONS.iter() {
            assert_eq!(action.is_reserved(), *action != AccessAction::Note);
        }
    }
}
