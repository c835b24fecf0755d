#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]

mod common;

use common::*;
use medchain::{AccessAction, ContractConfig, ContractError};
use soroban_sdk::{Address, String};

/// A patient, a doctor, and the id of the doctor's emergency access entry.
fn emergency_entry(ctx: &TestContext) -> (Address, Address, u64) {
    let patient = register_test_patient(ctx, "p1");
    let doctor = register_test_doctor(ctx, "d1");
    ctx.client
        .authorize(&doctor, &patient, &AccessAction::EmergencyAccess);
    let entry_id = ctx.client.audit_count();
    (patient, doctor, entry_id)
}

#[test]
fn test_emergency_access_opens_pending_review() {
    let ctx = setup_test_env();
    let (patient, doctor, entry_id) = emergency_entry(&ctx);

    let pending = ctx.client.pending_reviews(&patient, &patient, &0, &50);
    assert_eq!(pending.len(), 1);
    let review = pending.get(0).unwrap();
    assert_eq!(review.entry_id, entry_id);
    assert_eq!(review.actor, doctor);
    assert_eq!(review.requested_at, GENESIS);
    assert!(!review.reviewed);
    assert_eq!(ctx.client.get_review(&entry_id), review);
}

#[test]
fn test_patient_reviews_emergency_access() {
    let ctx = setup_test_env();
    let (patient, doctor, entry_id) = emergency_entry(&ctx);
    advance_time(&ctx, HOUR);

    let notes = Some(String::from_str(&ctx.env, "ER admission, expected"));
    let review = ctx.client.review_emergency_access(&patient, &entry_id, &notes);

    assert!(review.reviewed);
    assert_eq!(review.reviewer, Some(patient.clone()));
    assert_eq!(review.notes, notes);
    assert_eq!(review.reviewed_at, Some(GENESIS + HOUR));
    assert_eq!(ctx.client.pending_reviews(&patient, &patient, &0, &50).len(), 0);

    let latest = ctx.client.query_by_patient(&patient, &patient, &1, &0).get(0).unwrap();
    assert_eq!(latest.action, AccessAction::EmergencyReviewed);
    assert_eq!(latest.detail, notes);
    assert_eq!(latest.counterparty, Some(doctor.clone()));

    // the doctor's side of the log shows the review of their access
    let for_doctor = ctx.client.query_by_actor(&doctor, &doctor, &1, &0).get(0).unwrap();
    assert_eq!(for_doctor.id, latest.id);
}

#[test]
fn test_admin_may_review() {
    let ctx = setup_test_env();
    let (patient, _doctor, entry_id) = emergency_entry(&ctx);

    assert_eq!(ctx.client.pending_reviews(&ctx.admin, &patient, &0, &50).len(), 1);
    ctx.client
        .review_emergency_access(&ctx.admin, &entry_id, &None);
    assert!(ctx.client.get_review(&entry_id).reviewed);
}

#[test]
fn test_doctor_cannot_review_own_access() {
    let ctx = setup_test_env();
    let (patient, doctor, entry_id) = emergency_entry(&ctx);

    assert_eq!(
        ctx.client.try_review_emergency_access(&doctor, &entry_id, &None),
        Err(Ok(ContractError::Forbidden))
    );
    assert_eq!(
        ctx.client.try_pending_reviews(&doctor, &patient, &0, &50),
        Err(Ok(ContractError::Forbidden))
    );
}

#[test]
fn test_second_review_conflicts() {
    let ctx = setup_test_env();
    let (patient, _doctor, entry_id) = emergency_entry(&ctx);

    ctx.client.review_emergency_access(&patient, &entry_id, &None);
    assert_eq!(
        ctx.client.try_review_emergency_access(&patient, &entry_id, &None),
        Err(Ok(ContractError::Conflict))
    );
}

#[test]
fn test_reviewing_a_non_emergency_entry_is_not_found() {
    let ctx = setup_test_env();
    let (patient, doctor) = granted_pair(&ctx, "1");
    ctx.client.authorize(&doctor, &patient, &AccessAction::View);
    let view_entry = ctx.client.audit_count();

    assert_eq!(
        ctx.client.try_review_emergency_access(&patient, &view_entry, &None),
        Err(Ok(ContractError::NotFound))
    );
}

#[test]
fn test_pending_reviews_are_paginated_newest_first() {
    let ctx = setup_with_config(ContractConfig {
        max_page_size: 2,
        ..ContractConfig::default()
    });
    let patient = register_test_patient(&ctx, "p1");
    let doctor = register_test_doctor(&ctx, "d1");
    let mut ids = std::vec::Vec::new();
    for _ in 0..5 {
        ctx.client
            .authorize(&doctor, &patient, &AccessAction::EmergencyAccess);
        ids.push(ctx.client.audit_count());
    }
    // reviewed entries drop out of the listing and out of the offset count
    ctx.client.review_emergency_access(&patient, &ids[3], &None);

    let first = ctx.client.pending_reviews(&patient, &patient, &0, &10);
    assert_eq!(first.len(), 2);
    assert_eq!(first.get(0).unwrap().entry_id, ids[4]);
    assert_eq!(first.get(1).unwrap().entry_id, ids[2]);

    let second = ctx.client.pending_reviews(&patient, &patient, &2, &2);
    assert_eq!(second.len(), 2);
    assert_eq!(second.get(0).unwrap().entry_id, ids[1]);
    assert_eq!(second.get(1).unwrap().entry_id, ids[0]);

    assert!(ctx.client.pending_reviews(&patient, &patient, &4, &2).is_empty());
    assert!(ctx.client.pending_reviews(&patient, &patient, &0, &0).is_empty());
}
