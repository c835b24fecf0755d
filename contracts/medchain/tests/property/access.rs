//! Property-based tests for the access-control gate.
//!
//! Invariants tested:
//! - Without a grant row, `view` is always denied
//! - A grant expiring `d` seconds from now allows exactly while less than `d` seconds have passed
//! - Emergency access is always allowed and always flagged for review

use proptest::prelude::*;
use medchain::{AccessAction, DecisionReason};

use crate::common::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any number of `view` attempts without a grant row is denied, one entry each.
    #[test]
    fn prop_no_grant_always_denies(attempts in 1u32..6) {
        let ctx = setup_test_env();
        let patient = register_test_patient(&ctx, "p1");
        let doctor = register_test_doctor(&ctx, "d1");

        for _ in 0..attempts {
            let decision = ctx.client.authorize(&doctor, &patient, &AccessAction::View);
            prop_assert!(!decision.allowed);
            prop_assert_eq!(decision.reason, DecisionReason::Denied);
        }
        prop_assert_eq!(ctx.client.audit_count(), u64::from(attempts));
    }

    /// Expiry is strict: at `expires_at` itself the grant no longer applies.
    #[test]
    fn prop_expiry_boundary(duration in 1u64..=7 * 86_400, elapsed in 0u64..=14 * 86_400) {
        let ctx = setup_test_env();
        let patient = register_test_patient(&ctx, "p1");
        let doctor = register_test_doctor(&ctx, "d1");

        ctx.client.grant(&patient, &patient, &doctor, &Some(now(&ctx) + duration));
        advance_time(&ctx, elapsed);

        let decision = ctx.client.authorize(&doctor, &patient, &AccessAction::View);
        prop_assert_eq!(decision.allowed, elapsed < duration);
        prop_assert!(ctx.client.get_grant(&patient, &doctor).unwrap().granted);
    }

    /// Emergency access does not depend on the grant state.
    #[test]
    fn prop_emergency_always_flagged(grant_first in any::<bool>(), revoke_after in any::<bool>()) {
        let ctx = setup_test_env();
        let patient = register_test_patient(&ctx, "p1");
        let doctor = register_test_doctor(&ctx, "d1");

        if grant_first {
            ctx.client.grant(&patient, &patient, &doctor, &None);
            if revoke_after {
                ctx.client.revoke(&patient, &patient, &doctor);
            }
        }

        let decision = ctx.client.authorize(&doctor, &patient, &AccessAction::EmergencyAccess);
        prop_assert!(decision.allowed);
        prop_assert!(decision.requires_review);
        prop_assert_eq!(ctx.client.pending_reviews(&patient, &patient, &0, &50).len(), 1);
    }
}
