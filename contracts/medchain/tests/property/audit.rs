//! Property-based tests for the audit log vocabulary and ordering.

use proptest::prelude::*;
use medchain::{AccessAction, ContractError};
use soroban_sdk::Symbol;

use crate::common::*;

const VOCABULARY: [&str; 13] = [
    "view",
    "deny",
    "emergency_access",
    "access_requested",
    "access_invited",
    "grant",
    "revoke",
    "record_added",
    "diagnosis_added",
    "record_deleted",
    "profile_updated",
    "emergency_reviewed",
    "note",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Free-text tags outside the vocabulary never reach the log.
    #[test]
    fn prop_unknown_tags_rejected(tag in "[a-z_]{1,24}") {
        prop_assume!(!VOCABULARY.contains(&tag.as_str()));

        let ctx = setup_test_env();
        let patient = register_test_patient(&ctx, "p1");

        let result = ctx.client.try_record_access(
            &patient,
            &patient,
            &Symbol::new(&ctx.env, &tag),
            &None,
        );
        prop_assert_eq!(result, Err(Ok(ContractError::InvalidAction)));
        prop_assert_eq!(ctx.client.audit_count(), 0);
    }

    /// Only `note` is open to callers. Every other tag stays with the module
    /// that writes it, even for a doctor holding a grant.
    #[test]
    fn prop_contract_written_tags_rejected(index in 0usize..12) {
        let ctx = setup_test_env();
        let (patient, doctor) = granted_pair(&ctx, "1");
        let before = ctx.client.audit_count();

        let result = ctx.client.try_record_access(
            &doctor,
            &patient,
            &Symbol::new(&ctx.env, VOCABULARY[index]),
            &None,
        );
        prop_assert_eq!(result, Err(Ok(ContractError::Forbidden)));
        prop_assert_eq!(ctx.client.audit_count(), before);
    }

    /// Query results come back newest first for any interleaving of writes.
    #[test]
    fn prop_queries_newest_first(steps in prop::collection::vec(0u64..120, 1..8)) {
        let ctx = setup_test_env();
        let (patient, doctor) = granted_pair(&ctx, "1");

        for step in steps.iter() {
            advance_time(&ctx, *step);
            ctx.client.authorize(&doctor, &patient, &AccessAction::View);
        }

        let entries = ctx.client.query_by_patient(&patient, &patient, &50, &0);
        prop_assert_eq!(entries.len() as usize, steps.len() + 1);
        for i in 1..entries.len() {
            let newer = entries.get(i - 1).unwrap();
            let older = entries.get(i).unwrap();
            prop_assert!(newer.id > older.id);
            prop_assert!(newer.timestamp >= older.timestamp);
        }
    }
}
