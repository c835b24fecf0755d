//! Model-based test of the grant ledger and gate.
//!
//! Random operation sequences run against the contract and against a small
//! in-memory model of the single (patient, doctor) row. After every step the
//! gate decision, the stored row and the audit length must agree with the model.

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use medchain::{AccessAction, ContractError};

use crate::common::*;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Request,
    Invite,
    Grant { expires_in: Option<u16> },
    Revoke,
    View,
    Emergency,
    Advance(u16),
}

#[derive(Clone, Copy, Debug, Default)]
struct Row {
    granted: bool,
    expires_at: Option<u64>,
}

impl Row {
    fn allows(&self, now: u64) -> bool {
        self.granted && self.expires_at.map_or(true, |at| at > now)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_ledger_matches_model(ops in prop::collection::vec(any::<Op>(), 1..24)) {
        let ctx = setup_test_env();
        let patient = register_test_patient(&ctx, "p1");
        let doctor = register_test_doctor(&ctx, "d1");

        let mut model: Option<Row> = None;
        let mut entries = 0u64;
        let mut emergencies = 0u32;

        for op in ops {
            match op {
                Op::Request => {
                    ctx.client.request_access(&doctor, &patient);
                    model.get_or_insert_with(Row::default);
                    entries += 1;
                }
                Op::Invite => {
                    ctx.client.invite_doctor(&patient, &doctor);
                    model.get_or_insert_with(Row::default);
                    entries += 1;
                }
                Op::Grant { expires_in } => {
                    let expires_at = expires_in.map(|secs| now(&ctx) + u64::from(secs));
                    ctx.client.grant(&patient, &patient, &doctor, &expires_at);
                    model = Some(Row { granted: true, expires_at });
                    entries += 1;
                }
                Op::Revoke => {
                    let result = ctx.client.try_revoke(&patient, &patient, &doctor);
                    match model.as_mut() {
                        Some(row) => {
                            prop_assert!(result.is_ok());
                            row.granted = false;
                            entries += 1;
                        }
                        None => prop_assert_eq!(result, Err(Ok(ContractError::NotFound))),
                    }
                }
                Op::View => {
                    let decision = ctx.client.authorize(&doctor, &patient, &AccessAction::View);
                    let expected = model.map_or(false, |row| row.allows(now(&ctx)));
                    prop_assert_eq!(decision.allowed, expected);
                    prop_assert!(!decision.requires_review);
                    entries += 1;
                }
                Op::Emergency => {
                    let decision =
                        ctx.client.authorize(&doctor, &patient, &AccessAction::EmergencyAccess);
                    prop_assert!(decision.allowed);
                    prop_assert!(decision.requires_review);
                    entries += 1;
                    emergencies += 1;
                }
                Op::Advance(secs) => advance_time(&ctx, u64::from(secs)),
            }

            let stored = ctx.client.get_grant(&patient, &doctor);
            prop_assert_eq!(stored.is_some(), model.is_some());
            if let (Some(stored), Some(row)) = (stored, model) {
                prop_assert_eq!(stored.granted, row.granted);
            }
            prop_assert_eq!(ctx.client.audit_count(), entries);
        }

        prop_assert_eq!(ctx.client.pending_reviews(&patient, &patient, &0, &50).len(), emergencies);
    }
}
