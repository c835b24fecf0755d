//! Post-hoc review of emergency access.

use medchain_common::{extend_persistent, newest_window, seq_get, seq_len, seq_push};
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::audit::{self, AccessAction};
use crate::{config, events, validation, ContractError};

const REVIEW: Symbol = symbol_short!("EMRG");
const REVIEWS_BY_PATIENT: Symbol = symbol_short!("EMRG_PAT");

/// Keyed by the id of the `emergency_access` audit entry it covers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyReview {
    pub entry_id: u64,
    pub actor: Address,
    pub patient: Address,
    pub requested_at: u64,
    pub reviewed: bool,
    pub reviewer: Option<Address>,
    pub notes: Option<String>,
    pub reviewed_at: Option<u64>,
}

fn review_key(entry_id: u64) -> (Symbol, u64) {
    (REVIEW, entry_id)
}

pub(crate) fn open(env: &Env, entry_id: u64, actor: &Address, patient: &Address) {
    let review = EmergencyReview {
        entry_id,
        actor: actor.clone(),
        patient: patient.clone(),
        requested_at: env.ledger().timestamp(),
        reviewed: false,
        reviewer: None,
        notes: None,
        reviewed_at: None,
    };
    let key = review_key(entry_id);
    env.storage().persistent().set(&key, &review);
    extend_persistent(env, &key);

    seq_push(env, &REVIEWS_BY_PATIENT, patient, &entry_id);
}

pub fn get_review(env: &Env, entry_id: u64) -> Result<EmergencyReview, ContractError> {
    env.storage()
        .persistent()
        .get(&review_key(entry_id))
        .ok_or(ContractError::NotFound)
}

fn require_patient_or_admin(
    env: &Env,
    caller: &Address,
    patient: &Address,
) -> Result<(), ContractError> {
    if caller != patient && !config::is_admin(env, caller) {
        return Err(ContractError::Forbidden);
    }
    Ok(())
}

/// Unreviewed emergency accesses to `patient`, newest first. `offset` counts
/// pending reviews only.
pub fn pending_reviews(
    env: &Env,
    caller: Address,
    patient: Address,
    offset: u32,
    limit: u32,
) -> Result<Vec<EmergencyReview>, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    require_patient_or_admin(env, &caller, &patient)?;

    let limit = config::page_limit(env, limit);
    let mut reviews = Vec::new(env);
    let mut skipped = 0u32;
    let len = seq_len(env, &REVIEWS_BY_PATIENT, &patient);
    for n in newest_window(len, 0, len) {
        if reviews.len() >= limit {
            break;
        }
        let review = seq_get::<u64>(env, &REVIEWS_BY_PATIENT, &patient, n)
            .and_then(|entry_id| get_review(env, entry_id).ok())
            .ok_or(ContractError::StorageUnavailable)?;
        if review.reviewed {
            continue;
        }
        if skipped < offset {
            skipped += 1;
            continue;
        }
        reviews.push_back(review);
    }
    Ok(reviews)
}

pub fn review_emergency_access(
    env: &Env,
    reviewer: Address,
    entry_id: u64,
    notes: Option<String>,
) -> Result<EmergencyReview, ContractError> {
    config::require_initialized(env)?;
    reviewer.require_auth();

    let mut review = get_review(env, entry_id)?;
    require_patient_or_admin(env, &reviewer, &review.patient)?;
    if review.reviewed {
        return Err(ContractError::Conflict);
    }
    if let Some(text) = &notes {
        validation::validate_detail(text)?;
    }

    review.reviewed = true;
    review.reviewer = Some(reviewer.clone());
    review.notes = notes.clone();
    review.reviewed_at = Some(env.ledger().timestamp());
    let key = review_key(entry_id);
    env.storage().persistent().set(&key, &review);
    extend_persistent(env, &key);

    audit::append(
        env,
        &reviewer,
        &review.patient,
        AccessAction::EmergencyReviewed,
        Some(&review.actor),
        notes,
    );
    events::publish_emergency_reviewed(env, entry_id, review.patient.clone(), reviewer);
    Ok(review)
}
