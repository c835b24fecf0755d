//! Access-control gate.
//!
//! Decides whether an actor may touch a patient's records. A patient acting on
//! their own file is always allowed without a grant lookup, and an emergency
//! read of their own file is logged as a plain `view`. Every decision, allow or
//! deny, appends exactly one audit entry before it is returned.

use soroban_sdk::{contracttype, log, Address, Env, String};

use crate::audit::{self, AccessAction};
use crate::identity::{self, Role};
use crate::{config, events, ledger, review, ContractError};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecisionReason {
    SelfAccess,
    Granted,
    EmergencyOverride,
    Denied,
}

/// Outcome of a gate check. `requires_review` is set only on emergency allowances.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
    pub requires_review: bool,
}

impl Decision {
    pub fn self_access() -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::SelfAccess,
            requires_review: false,
        }
    }

    fn granted() -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::Granted,
            requires_review: false,
        }
    }

    fn emergency() -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::EmergencyOverride,
            requires_review: true,
        }
    }

    fn denied() -> Self {
        Self {
            allowed: false,
            reason: DecisionReason::Denied,
            requires_review: false,
        }
    }
}

/// Why a request was denied. Stored in the audit detail only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DenyCause {
    NoGrant,
    NotGranted,
    Expired,
    NotDoctor,
}

impl DenyCause {
    pub fn tag(&self) -> &'static str {
        match self {
            DenyCause::NoGrant => "no_grant",
            DenyCause::NotGranted => "not_granted",
            DenyCause::Expired => "expired",
            DenyCause::NotDoctor => "not_doctor",
        }
    }
}

fn is_gated(action: AccessAction) -> bool {
    matches!(
        action,
        AccessAction::View
            | AccessAction::EmergencyAccess
            | AccessAction::RecordAdded
            | AccessAction::DiagnosisAdded
    )
}

/// Checks the grant row for (patient, doctor) as it is in storage right now.
fn evaluate_grant(env: &Env, patient: &Address, doctor: &Address) -> Result<(), DenyCause> {
    let now = env.ledger().timestamp();
    match ledger::load_grant(env, patient, doctor) {
        None => Err(DenyCause::NoGrant),
        Some(grant) if !grant.granted => Err(DenyCause::NotGranted),
        Some(grant) if grant.is_expired(now) => Err(DenyCause::Expired),
        Some(_) => Ok(()),
    }
}

/// Public entrypoint: authenticates the actor, then decides.
pub fn authorize(
    env: &Env,
    actor: Address,
    patient: Address,
    action: AccessAction,
) -> Result<Decision, ContractError> {
    config::require_initialized(env)?;
    actor.require_auth();
    decide(env, &actor, &patient, action)
}

/// Decision path shared by `authorize` and the record store. The caller is
/// responsible for authenticating `actor`.
///
/// Errors are reserved for malformed requests (unknown action, unknown actor
/// or patient). A deny is an `Ok` decision so that its audit entry commits.
pub(crate) fn decide(
    env: &Env,
    actor: &Address,
    patient: &Address,
    action: AccessAction,
) -> Result<Decision, ContractError> {
    if !is_gated(action) {
        return Err(ContractError::InvalidAction);
    }
    identity::require_patient(env, patient)?;
    let self_access = actor == patient;
    let outcome = if self_access {
        Ok(())
    } else {
        let user = identity::load_user(env, actor).ok_or(ContractError::NotFound)?;
        if user.role != Role::Doctor {
            Err(DenyCause::NotDoctor)
        } else if action == AccessAction::EmergencyAccess {
            Ok(())
        } else {
            evaluate_grant(env, patient, actor)
        }
    };

    let (decision, entry_id) = match outcome {
        Ok(()) if self_access => {
            let logged = if action == AccessAction::EmergencyAccess {
                AccessAction::View
            } else {
                action
            };
            let entry_id = audit::append(env, actor, patient, logged, None, None);
            (Decision::self_access(), entry_id)
        }
        Ok(()) => {
            let entry_id = audit::append(env, actor, patient, action, None, None);
            if action == AccessAction::EmergencyAccess {
                review::open(env, entry_id, actor, patient);
                (Decision::emergency(), entry_id)
            } else {
                (Decision::granted(), entry_id)
            }
        }
        Err(cause) => {
            let detail = String::from_str(env, cause.tag());
            let entry_id =
                audit::append(env, actor, patient, AccessAction::Deny, None, Some(detail));
            (Decision::denied(), entry_id)
        }
    };

    log!(
        env,
        "gate decision",
        actor.clone(),
        patient.clone(),
        decision.allowed,
        entry_id
    );
    events::publish_access_decision(
        env,
        actor.clone(),
        patient.clone(),
        action,
        decision.clone(),
        entry_id,
    );
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_record_actions_are_gated() {
        assert!(is_gated(AccessAction::View));
        assert!(is_gated(AccessAction::EmergencyAccess));
        assert!(is_gated(AccessAction::DiagnosisAdded));
        assert!(!is_gated(AccessAction::Grant));
        assert!(!is_gated(AccessAction::Deny));
        assert!(!is_gated(AccessAction::EmergencyReviewed));
    }

    #[test]
    fn test_only_emergency_decisions_require_review() {
        assert!(Decision::emergency().requires_review);
        assert!(!Decision::granted().requires_review);
        assert!(!Decision::self_access().requires_review);
        assert!(!Decision::denied().allowed);
    }

    #[test]
    fn test_deny_cause_tags() {
        assert_eq!(DenyCause::NoGrant.tag(), "no_grant");
        assert_eq!(DenyCause::Expired.tag(), "expired");
    }
}
