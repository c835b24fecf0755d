use soroban_sdk::{symbol_short, Address, Env};

use crate::audit::AccessAction;
use crate::config::ContractConfig;
use crate::gate::Decision;
use crate::identity::Role;
use crate::records::RecordType;

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when the admin replaces the contract configuration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdatedEvent {
    pub admin: Address,
    pub config: ContractConfig,
    pub timestamp: u64,
}

/// Event published when a patient or doctor registers.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub user: Address,
    pub user_id: u64,
    pub role: Role,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserUpdatedEvent {
    pub user: Address,
    pub timestamp: u64,
}

/// Event published when a user and everything owned by it is removed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserDeletedEvent {
    pub user: Address,
    pub role: Role,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginEvent {
    pub user: Address,
    pub expires_at: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAddedEvent {
    pub record_id: u64,
    pub patient: Address,
    pub author: Address,
    pub record_type: RecordType,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordDeletedEvent {
    pub record_id: u64,
    pub patient: Address,
    pub timestamp: u64,
}

/// Event published when a grant row is first created or re-requested.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRequestedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub initiator: Address,
    pub created: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub expires_at: Option<u64>,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRevokedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub timestamp: u64,
}

/// Event published for every decision the access-control gate takes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessDecisionEvent {
    pub actor: Address,
    pub patient: Address,
    pub action: AccessAction,
    pub decision: Decision,
    pub entry_id: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyReviewedEvent {
    pub entry_id: u64,
    pub patient: Address,
    pub reviewer: Address,
    pub timestamp: u64,
}

/// Event published for every appended audit entry.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditAppendedEvent {
    pub entry_id: u64,
    pub actor: Address,
    pub action: AccessAction,
    pub counterparty: Option<Address>,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_config_updated(env: &Env, admin: Address, config: ContractConfig) {
    let topics = (symbol_short!("CFG_UPD"), admin.clone());
    let data = ConfigUpdatedEvent {
        admin,
        config,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new user is registered.
pub fn publish_user_registered(env: &Env, user: Address, user_id: u64, role: Role) {
    let topics = (symbol_short!("USR_REG"), user.clone());
    let data = UserRegisteredEvent {
        user,
        user_id,
        role,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_user_updated(env: &Env, user: Address) {
    let topics = (symbol_short!("USR_UPD"), user.clone());
    let data = UserUpdatedEvent {
        user,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_user_deleted(env: &Env, user: Address, role: Role) {
    let topics = (symbol_short!("USR_DEL"), user.clone());
    let data = UserDeletedEvent {
        user,
        role,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_login(env: &Env, user: Address, expires_at: u64) {
    let topics = (symbol_short!("LOGIN"), user.clone());
    let data = LoginEvent {
        user,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a medical record is stored.
pub fn publish_record_added(
    env: &Env,
    record_id: u64,
    patient: Address,
    author: Address,
    record_type: RecordType,
) {
    let topics = (symbol_short!("REC_ADD"), patient.clone(), author.clone());
    let data = RecordAddedEvent {
        record_id,
        patient,
        author,
        record_type,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_record_deleted(env: &Env, record_id: u64, patient: Address) {
    let topics = (symbol_short!("REC_DEL"), patient.clone());
    let data = RecordDeletedEvent {
        record_id,
        patient,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_requested(
    env: &Env,
    patient: Address,
    doctor: Address,
    initiator: Address,
    created: bool,
) {
    let topics = (symbol_short!("ACC_REQ"), patient.clone(), doctor.clone());
    let data = AccessRequestedEvent {
        patient,
        doctor,
        initiator,
        created,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a patient approves a doctor's access.
pub fn publish_access_granted(
    env: &Env,
    patient: Address,
    doctor: Address,
    expires_at: Option<u64>,
) {
    let topics = (symbol_short!("ACC_GRT"), patient.clone(), doctor.clone());
    let data = AccessGrantedEvent {
        patient,
        doctor,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_revoked(env: &Env, patient: Address, doctor: Address) {
    let topics = (symbol_short!("ACC_REV"), patient.clone(), doctor.clone());
    let data = AccessRevokedEvent {
        patient,
        doctor,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_decision(
    env: &Env,
    actor: Address,
    patient: Address,
    action: AccessAction,
    decision: Decision,
    entry_id: u64,
) {
    let topics = (symbol_short!("ACC_DEC"), actor.clone(), patient.clone());
    let data = AccessDecisionEvent {
        actor,
        patient,
        action,
        decision,
        entry_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_emergency_reviewed(env: &Env, entry_id: u64, patient: Address, reviewer: Address) {
    let topics = (symbol_short!("EMRG_REV"), patient.clone());
    let data = EmergencyReviewedEvent {
        entry_id,
        patient,
        reviewer,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_audit_appended(
    env: &Env,
    entry_id: u64,
    patient: Address,
    actor: Address,
    action: AccessAction,
    counterparty: Option<Address>,
) {
    let topics = (symbol_short!("AUDIT"), patient);
    let data = AuditAppendedEvent {
        entry_id,
        actor,
        action,
        counterparty,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
