//! Medical record store. Records are only reachable through the gate.

use medchain_common::{extend_persistent, newest_first, remove_item};
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::audit::{self, AccessAction};
use crate::gate::{self, Decision};
use crate::{config, events, validation, ContractError};

const RECORD_COUNTER: Symbol = symbol_short!("REC_CTR");
const RECORD: Symbol = symbol_short!("RECORD");
const PATIENT_RECORDS: Symbol = symbol_short!("PAT_REC");
const DOCTOR_RECORDS: Symbol = symbol_short!("DOC_REC");

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordType {
    Consultation,
    Diagnosis,
    Prescription,
    LabResult,
    Imaging,
    Other,
}

/// Medical record structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalRecord {
    pub id: u64,
    pub patient: Address,
    /// Authoring doctor. `None` for patient-authored records and for records
    /// whose author has since been deleted.
    pub doctor: Option<Address>,
    pub title: String,
    pub content: String,
    pub record_type: RecordType,
    pub file_reference: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewRecord {
    pub title: String,
    pub content: String,
    pub record_type: RecordType,
    pub file_reference: Option<String>,
}

/// Result of `add_record`. `record_id` is set only when the write was allowed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordWrite {
    pub decision: Decision,
    pub record_id: Option<u64>,
}

/// Result of a list read. `records` is empty when the decision denies.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAccess {
    pub decision: Decision,
    pub records: Vec<MedicalRecord>,
}

fn record_key(id: u64) -> (Symbol, u64) {
    (RECORD, id)
}

fn patient_records_key(patient: &Address) -> (Symbol, Address) {
    (PATIENT_RECORDS, patient.clone())
}

fn doctor_records_key(doctor: &Address) -> (Symbol, Address) {
    (DOCTOR_RECORDS, doctor.clone())
}

fn load_ids(env: &Env, key: &(Symbol, Address)) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or(Vec::new(env))
}

fn push_id(env: &Env, key: &(Symbol, Address), id: u64) {
    let mut ids = load_ids(env, key);
    ids.push_back(id);
    env.storage().persistent().set(key, &ids);
    extend_persistent(env, key);
}

fn drop_id(env: &Env, key: &(Symbol, Address), id: u64) {
    let mut ids = load_ids(env, key);
    if remove_item(&mut ids, &id) {
        env.storage().persistent().set(key, &ids);
    }
}

fn next_record_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&RECORD_COUNTER)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&RECORD_COUNTER, &id);
    id
}

fn validate_new_record(input: &NewRecord) -> Result<(), ContractError> {
    validation::validate_label(&input.title)?;
    validation::validate_text(&input.content)?;
    if let Some(file_ref) = &input.file_reference {
        validation::validate_file_reference(file_ref)?;
    }
    Ok(())
}

fn store_record(env: &Env, record: &MedicalRecord) {
    let key = record_key(record.id);
    env.storage().persistent().set(&key, record);
    extend_persistent(env, &key);
}

pub fn load_record(env: &Env, id: u64) -> Option<MedicalRecord> {
    env.storage().persistent().get(&record_key(id))
}

/// Adds a record to `patient`'s file.
///
/// The gate is consulted with `diagnosis_added` for diagnoses and
/// `record_added` otherwise. A patient writing to their own file is always
/// allowed. A denied write returns the decision with no record id.
pub fn add_record(
    env: &Env,
    author: Address,
    patient: Address,
    input: NewRecord,
) -> Result<RecordWrite, ContractError> {
    config::require_initialized(env)?;
    author.require_auth();
    validate_new_record(&input)?;

    let action = if input.record_type == RecordType::Diagnosis {
        AccessAction::DiagnosisAdded
    } else {
        AccessAction::RecordAdded
    };
    let decision = gate::decide(env, &author, &patient, action)?;
    if !decision.allowed {
        return Ok(RecordWrite {
            decision,
            record_id: None,
        });
    }

    let self_authored = author == patient;
    let now = env.ledger().timestamp();
    let record = MedicalRecord {
        id: next_record_id(env),
        patient: patient.clone(),
        doctor: if self_authored {
            None
        } else {
            Some(author.clone())
        },
        title: input.title,
        content: input.content,
        record_type: input.record_type,
        file_reference: input.file_reference,
        created_at: now,
        updated_at: now,
    };
    store_record(env, &record);
    push_id(env, &patient_records_key(&patient), record.id);
    if !self_authored {
        push_id(env, &doctor_records_key(&author), record.id);
    }

    events::publish_record_added(env, record.id, patient, author, record.record_type);
    Ok(RecordWrite {
        decision,
        record_id: Some(record.id),
    })
}

fn load_page(
    env: &Env,
    patient: &Address,
    offset: u32,
    limit: u32,
) -> Result<Vec<MedicalRecord>, ContractError> {
    let ids = load_ids(env, &patient_records_key(patient));
    let mut records = Vec::new(env);
    for id in newest_first(env, &ids, offset, config::page_limit(env, limit)).iter() {
        let record = load_record(env, id).ok_or(ContractError::StorageUnavailable)?;
        records.push_back(record);
    }
    Ok(records)
}

fn read_through_gate(
    env: &Env,
    caller: Address,
    patient: Address,
    action: AccessAction,
    offset: u32,
    limit: u32,
) -> Result<RecordAccess, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();

    let decision = gate::decide(env, &caller, &patient, action)?;
    let records = if decision.allowed {
        load_page(env, &patient, offset, limit)?
    } else {
        Vec::new(env)
    };
    Ok(RecordAccess { decision, records })
}

/// Lists `patient`'s records, newest first.
pub fn read_records(
    env: &Env,
    caller: Address,
    patient: Address,
    offset: u32,
    limit: u32,
) -> Result<RecordAccess, ContractError> {
    read_through_gate(env, caller, patient, AccessAction::View, offset, limit)
}

/// Like `read_records`, but through the emergency override. The access is
/// queued for review.
pub fn emergency_read(
    env: &Env,
    caller: Address,
    patient: Address,
    offset: u32,
    limit: u32,
) -> Result<RecordAccess, ContractError> {
    read_through_gate(
        env,
        caller,
        patient,
        AccessAction::EmergencyAccess,
        offset,
        limit,
    )
}

/// Reads one record. `records` holds it when the decision allows.
pub fn read_record(env: &Env, caller: Address, record_id: u64) -> Result<RecordAccess, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();

    let record = load_record(env, record_id).ok_or(ContractError::NotFound)?;
    let decision = gate::decide(env, &caller, &record.patient, AccessAction::View)?;
    let mut records = Vec::new(env);
    if decision.allowed {
        records.push_back(record);
    }
    Ok(RecordAccess { decision, records })
}

/// Deletes one record. Only the owning patient may do this.
pub fn delete_record(env: &Env, patient: Address, record_id: u64) -> Result<(), ContractError> {
    config::require_initialized(env)?;
    patient.require_auth();

    let record = load_record(env, record_id).ok_or(ContractError::NotFound)?;
    if record.patient != patient {
        return Err(ContractError::Forbidden);
    }
    remove_record(env, &record);
    drop_id(env, &patient_records_key(&patient), record_id);

    audit::append(env, &patient, &patient, AccessAction::RecordDeleted, None, None);
    events::publish_record_deleted(env, record_id, patient);
    Ok(())
}

/// Removes the record and its doctor index entry. The patient index is left
/// to the caller.
fn remove_record(env: &Env, record: &MedicalRecord) {
    env.storage().persistent().remove(&record_key(record.id));
    if let Some(doctor) = &record.doctor {
        drop_id(env, &doctor_records_key(doctor), record.id);
    }
}

/// Deletes every record in `patient`'s file.
pub(crate) fn purge_patient(env: &Env, patient: &Address) -> Result<(), ContractError> {
    let key = patient_records_key(patient);
    for id in load_ids(env, &key).iter() {
        let record = load_record(env, id).ok_or(ContractError::StorageUnavailable)?;
        remove_record(env, &record);
    }
    env.storage().persistent().remove(&key);
    Ok(())
}

/// Clears the author on every record `doctor` wrote.
pub(crate) fn detach_doctor(env: &Env, doctor: &Address) -> Result<(), ContractError> {
    let key = doctor_records_key(doctor);
    let now = env.ledger().timestamp();
    for id in load_ids(env, &key).iter() {
        let mut record = load_record(env, id).ok_or(ContractError::StorageUnavailable)?;
        record.doctor = None;
        record.updated_at = now;
        store_record(env, &record);
    }
    env.storage().persistent().remove(&key);
    Ok(())
}
