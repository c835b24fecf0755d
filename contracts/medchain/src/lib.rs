#![no_std]

pub mod audit;
pub mod config;
pub mod errors;
pub mod events;
pub mod gate;
pub mod identity;
pub mod ledger;
pub mod records;
pub mod review;
pub mod session;
pub mod validation;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Vec};

pub use audit::{AccessAction, AccessLogEntry};
pub use config::ContractConfig;
pub use errors::{ContractError, ErrorCategory, ErrorSeverity};
pub use gate::{Decision, DecisionReason};
pub use identity::{
    BloodGroup, DoctorProfile, DoctorRegistration, Gender, PatientProfile, PatientProfileUpdate,
    PatientRegistration, Role, User, UserUpdate,
};
pub use ledger::AccessGrant;
pub use records::{MedicalRecord, NewRecord, RecordAccess, RecordType, RecordWrite};
pub use review::EmergencyReview;
pub use session::Session;

#[contract]
pub struct MedChainContract;

#[contractimpl]
impl MedChainContract {
    // ======================== Lifecycle ========================

    /// Initialize the contract with an admin address and runtime configuration
    pub fn initialize(env: Env, admin: Address, config: ContractConfig) -> Result<(), ContractError> {
        config::initialize(&env, admin, config)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        config::get_admin(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn get_config(env: Env) -> ContractConfig {
        config::get_config(&env)
    }

    /// Replace the runtime configuration. Admin only.
    pub fn set_config(env: Env, caller: Address, config: ContractConfig) -> Result<(), ContractError> {
        config::set_config(&env, caller, config)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    // ======================== Identity ========================

    pub fn register_patient(
        env: Env,
        wallet: Address,
        input: PatientRegistration,
    ) -> Result<User, ContractError> {
        identity::register_patient(&env, wallet, input)
    }

    pub fn register_doctor(
        env: Env,
        wallet: Address,
        input: DoctorRegistration,
    ) -> Result<User, ContractError> {
        identity::register_doctor(&env, wallet, input)
    }

    pub fn get_user(env: Env, wallet: Address) -> Result<User, ContractError> {
        identity::get_user(&env, wallet)
    }

    pub fn get_user_by_id(env: Env, id: u64) -> Result<User, ContractError> {
        identity::get_user_by_id(&env, id)
    }

    pub fn get_patient_profile(env: Env, wallet: Address) -> Result<PatientProfile, ContractError> {
        identity::get_patient_profile(&env, wallet)
    }

    pub fn get_doctor_profile(env: Env, wallet: Address) -> Result<DoctorProfile, ContractError> {
        identity::get_doctor_profile(&env, wallet)
    }

    pub fn update_user(env: Env, wallet: Address, update: UserUpdate) -> Result<User, ContractError> {
        identity::update_user(&env, wallet, update)
    }

    pub fn update_patient_profile(
        env: Env,
        wallet: Address,
        update: PatientProfileUpdate,
    ) -> Result<PatientProfile, ContractError> {
        identity::update_patient_profile(&env, wallet, update)
    }

    pub fn list_doctors(env: Env, offset: u32, limit: u32) -> Result<Vec<User>, ContractError> {
        identity::list_doctors(&env, offset, limit)
    }

    pub fn list_patients(
        env: Env,
        caller: Address,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<User>, ContractError> {
        identity::list_patients(&env, caller, offset, limit)
    }

    /// Delete a user together with their profile, records and grants.
    pub fn delete_user(env: Env, wallet: Address) -> Result<(), ContractError> {
        identity::delete_user(&env, wallet)
    }

    // ======================== Sessions ========================

    pub fn login(env: Env, wallet: Address) -> Result<Session, ContractError> {
        session::login(&env, wallet)
    }

    pub fn get_session(env: Env, wallet: Address) -> Option<Session> {
        session::get_session(&env, wallet)
    }

    pub fn end_session(env: Env, wallet: Address) -> Result<(), ContractError> {
        session::end_session(&env, wallet)
    }

    // ======================== Access Grants ========================

    /// A doctor asks for access to a patient's records.
    pub fn request_access(
        env: Env,
        doctor: Address,
        patient: Address,
    ) -> Result<AccessGrant, ContractError> {
        ledger::request_access(&env, doctor, patient)
    }

    /// A patient invites a doctor. The row stays ungranted until `grant`.
    pub fn invite_doctor(
        env: Env,
        patient: Address,
        doctor: Address,
    ) -> Result<AccessGrant, ContractError> {
        ledger::invite_doctor(&env, patient, doctor)
    }

    pub fn grant(
        env: Env,
        caller: Address,
        patient: Address,
        doctor: Address,
        expires_at: Option<u64>,
    ) -> Result<AccessGrant, ContractError> {
        ledger::grant(&env, caller, patient, doctor, expires_at)
    }

    pub fn revoke(
        env: Env,
        caller: Address,
        patient: Address,
        doctor: Address,
    ) -> Result<AccessGrant, ContractError> {
        ledger::revoke(&env, caller, patient, doctor)
    }

    pub fn get_grant(env: Env, patient: Address, doctor: Address) -> Option<AccessGrant> {
        ledger::load_grant(&env, &patient, &doctor)
    }

    pub fn list_patient_grants(
        env: Env,
        patient: Address,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<AccessGrant>, ContractError> {
        ledger::list_patient_grants(&env, patient, offset, limit)
    }

    pub fn list_doctor_grants(
        env: Env,
        doctor: Address,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<AccessGrant>, ContractError> {
        ledger::list_doctor_grants(&env, doctor, offset, limit)
    }

    // ======================== Access Gate ========================

    /// Decide whether `actor` may perform `action` on `patient`'s records.
    /// Every decision, allow or deny, is written to the audit log.
    pub fn authorize(
        env: Env,
        actor: Address,
        patient: Address,
        action: AccessAction,
    ) -> Result<Decision, ContractError> {
        gate::authorize(&env, actor, patient, action)
    }

    // ======================== Records ========================

    pub fn add_record(
        env: Env,
        author: Address,
        patient: Address,
        input: NewRecord,
    ) -> Result<RecordWrite, ContractError> {
        records::add_record(&env, author, patient, input)
    }

    pub fn read_records(
        env: Env,
        caller: Address,
        patient: Address,
        offset: u32,
        limit: u32,
    ) -> Result<RecordAccess, ContractError> {
        records::read_records(&env, caller, patient, offset, limit)
    }

    pub fn emergency_read(
        env: Env,
        caller: Address,
        patient: Address,
        offset: u32,
        limit: u32,
    ) -> Result<RecordAccess, ContractError> {
        records::emergency_read(&env, caller, patient, offset, limit)
    }

    pub fn read_record(env: Env, caller: Address, record_id: u64) -> Result<RecordAccess, ContractError> {
        records::read_record(&env, caller, record_id)
    }

    pub fn delete_record(env: Env, patient: Address, record_id: u64) -> Result<(), ContractError> {
        records::delete_record(&env, patient, record_id)
    }

    // ======================== Audit Log ========================

    pub fn record_access(
        env: Env,
        actor: Address,
        patient: Address,
        action: Symbol,
        detail: Option<String>,
    ) -> Result<u64, ContractError> {
        audit::record(&env, actor, patient, action, detail)
    }

    pub fn query_by_patient(
        env: Env,
        caller: Address,
        patient: Address,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<AccessLogEntry>, ContractError> {
        audit::query_by_patient(&env, caller, patient, limit, offset)
    }

    pub fn query_by_actor(
        env: Env,
        caller: Address,
        actor: Address,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<AccessLogEntry>, ContractError> {
        audit::query_by_actor(&env, caller, actor, limit, offset)
    }

    pub fn audit_count(env: Env) -> u64 {
        audit::count(&env)
    }

    pub fn patient_audit_count(env: Env, patient: Address) -> u32 {
        audit::patient_count(&env, &patient)
    }

    // ======================== Emergency Review ========================

    pub fn pending_reviews(
        env: Env,
        caller: Address,
        patient: Address,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<EmergencyReview>, ContractError> {
        review::pending_reviews(&env, caller, patient, offset, limit)
    }

    pub fn review_emergency_access(
        env: Env,
        reviewer: Address,
        entry_id: u64,
        notes: Option<String>,
    ) -> Result<EmergencyReview, ContractError> {
        review::review_emergency_access(&env, reviewer, entry_id, notes)
    }

    pub fn get_review(env: Env, entry_id: u64) -> Result<EmergencyReview, ContractError> {
        review::get_review(&env, entry_id)
    }
}
