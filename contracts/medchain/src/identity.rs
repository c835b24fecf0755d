//! Identity store: users keyed by wallet address, plus the role profile.

use medchain_common::{
    extend_persistent, newest_first, remove_item, to_ascii_lowercase, to_ascii_uppercase,
};
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::audit::{self, AccessAction};
use crate::{config, events, ledger, records, session, validation, ContractError};

const USER: Symbol = symbol_short!("USER");
const USER_ID: Symbol = symbol_short!("USER_ID");
const USER_COUNTER: Symbol = symbol_short!("USR_CTR");
const EMAIL: Symbol = symbol_short!("EMAIL");
const LICENSE: Symbol = symbol_short!("LICENSE");
const PATIENT: Symbol = symbol_short!("PATIENT");
const DOCTOR: Symbol = symbol_short!("DOCTOR");
const PATIENT_INDEX: Symbol = symbol_short!("PAT_IDX");
const DOCTOR_INDEX: Symbol = symbol_short!("DOC_IDX");

const MAX_EMAIL_BYTES: usize = 254;

/// Fixed at registration; no operation changes it.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Patient = 1,
    Doctor = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gender {
    Unspecified,
    Male,
    Female,
    Other,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BloodGroup {
    Unknown,
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

/// User information structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub id: u64,
    pub wallet: Address,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientProfile {
    pub user: Address,
    pub address: String,
    pub blood_group: BloodGroup,
    pub medical_history: String,
    pub medical_record_file: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorProfile {
    pub user: Address,
    pub medical_id: String,
    pub specialization: String,
    pub qualification: String,
    pub hospital_name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<String>,
    pub address: String,
    pub blood_group: BloodGroup,
    pub medical_history: String,
    pub medical_record_file: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<String>,
    pub medical_id: String,
    pub specialization: String,
    pub qualification: String,
    pub hospital_name: String,
}

/// Contact fields a user may change. The role and email are not part of it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserUpdate {
    pub full_name: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientProfileUpdate {
    pub address: String,
    pub blood_group: BloodGroup,
    pub medical_history: String,
    pub medical_record_file: Option<String>,
}

fn user_key(wallet: &Address) -> (Symbol, Address) {
    (USER, wallet.clone())
}

fn user_id_key(id: u64) -> (Symbol, u64) {
    (USER_ID, id)
}

fn email_key(email: &String) -> (Symbol, String) {
    (EMAIL, email.clone())
}

fn license_key(medical_id: &String) -> (Symbol, String) {
    (LICENSE, medical_id.clone())
}

fn patient_key(wallet: &Address) -> (Symbol, Address) {
    (PATIENT, wallet.clone())
}

fn doctor_key(wallet: &Address) -> (Symbol, Address) {
    (DOCTOR, wallet.clone())
}

fn directory_key(role: Role) -> Symbol {
    match role {
        Role::Patient => PATIENT_INDEX,
        Role::Doctor => DOCTOR_INDEX,
    }
}

fn validate_contact(
    full_name: &String,
    phone: &Option<String>,
    date_of_birth: &Option<String>,
) -> Result<(), ContractError> {
    validation::validate_name(full_name)?;
    if let Some(phone) = phone {
        validation::validate_phone(phone)?;
    }
    if let Some(date) = date_of_birth {
        validation::validate_date(date)?;
    }
    Ok(())
}

fn validate_patient_details(
    address: &String,
    medical_history: &String,
    medical_record_file: &Option<String>,
) -> Result<(), ContractError> {
    validation::validate_text(address)?;
    validation::validate_text(medical_history)?;
    if let Some(file_ref) = medical_record_file {
        validation::validate_file_reference(file_ref)?;
    }
    Ok(())
}

fn normalize_email(env: &Env, email: &String) -> Result<String, ContractError> {
    validation::validate_email(email)?;
    to_ascii_lowercase::<MAX_EMAIL_BYTES>(env, email).ok_or(ContractError::InvalidInput)
}

/// License ids are unique regardless of letter case and are stored uppercased.
fn normalize_medical_id(env: &Env, medical_id: &String) -> Result<String, ContractError> {
    validation::validate_medical_id(medical_id)?;
    to_ascii_uppercase::<{ validation::MAX_MEDICAL_ID_LEN as usize }>(env, medical_id)
        .ok_or(ContractError::InvalidInput)
}

fn push_directory(env: &Env, role: Role, wallet: &Address) {
    let key = directory_key(role);
    let mut wallets: Vec<Address> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    wallets.push_back(wallet.clone());
    env.storage().persistent().set(&key, &wallets);
    extend_persistent(env, &key);
}

fn remove_from_directory(env: &Env, role: Role, wallet: &Address) {
    let key = directory_key(role);
    let mut wallets: Vec<Address> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    if remove_item(&mut wallets, wallet) {
        env.storage().persistent().set(&key, &wallets);
    }
}

/// Stores the shared user row after the uniqueness checks pass.
#[allow(clippy::too_many_arguments)]
fn create_user(
    env: &Env,
    wallet: &Address,
    role: Role,
    full_name: String,
    email: String,
    phone: Option<String>,
    gender: Gender,
    date_of_birth: Option<String>,
) -> User {
    let id: u64 = env
        .storage()
        .instance()
        .get(&USER_COUNTER)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&USER_COUNTER, &id);

    let now = env.ledger().timestamp();
    let user = User {
        id,
        wallet: wallet.clone(),
        email: email.clone(),
        role,
        full_name,
        phone,
        gender,
        date_of_birth,
        created_at: now,
        updated_at: now,
    };

    let key = user_key(wallet);
    env.storage().persistent().set(&key, &user);
    extend_persistent(env, &key);

    let id_key = user_id_key(id);
    env.storage().persistent().set(&id_key, wallet);
    extend_persistent(env, &id_key);

    let mail_key = email_key(&email);
    env.storage().persistent().set(&mail_key, wallet);
    extend_persistent(env, &mail_key);

    push_directory(env, role, wallet);
    user
}

fn ensure_unregistered(env: &Env, wallet: &Address, email: &String) -> Result<(), ContractError> {
    if env.storage().persistent().has(&user_key(wallet))
        || env.storage().persistent().has(&email_key(email))
    {
        return Err(ContractError::Conflict);
    }
    Ok(())
}

pub fn register_patient(
    env: &Env,
    wallet: Address,
    input: PatientRegistration,
) -> Result<User, ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    validate_contact(&input.full_name, &input.phone, &input.date_of_birth)?;
    validate_patient_details(
        &input.address,
        &input.medical_history,
        &input.medical_record_file,
    )?;
    let email = normalize_email(env, &input.email)?;
    ensure_unregistered(env, &wallet, &email)?;

    let user = create_user(
        env,
        &wallet,
        Role::Patient,
        input.full_name,
        email,
        input.phone,
        input.gender,
        input.date_of_birth,
    );

    let profile = PatientProfile {
        user: wallet.clone(),
        address: input.address,
        blood_group: input.blood_group,
        medical_history: input.medical_history,
        medical_record_file: input.medical_record_file,
    };
    let key = patient_key(&wallet);
    env.storage().persistent().set(&key, &profile);
    extend_persistent(env, &key);

    events::publish_user_registered(env, wallet, user.id, Role::Patient);
    Ok(user)
}

pub fn register_doctor(
    env: &Env,
    wallet: Address,
    input: DoctorRegistration,
) -> Result<User, ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    validate_contact(&input.full_name, &input.phone, &input.date_of_birth)?;
    let medical_id = normalize_medical_id(env, &input.medical_id)?;
    validation::validate_label(&input.specialization)?;
    validation::validate_label(&input.qualification)?;
    validation::validate_label(&input.hospital_name)?;
    let email = normalize_email(env, &input.email)?;
    ensure_unregistered(env, &wallet, &email)?;
    if env.storage().persistent().has(&license_key(&medical_id)) {
        return Err(ContractError::Conflict);
    }

    let user = create_user(
        env,
        &wallet,
        Role::Doctor,
        input.full_name,
        email,
        input.phone,
        input.gender,
        input.date_of_birth,
    );

    let lic_key = license_key(&medical_id);
    env.storage().persistent().set(&lic_key, &wallet);
    extend_persistent(env, &lic_key);

    let profile = DoctorProfile {
        user: wallet.clone(),
        medical_id,
        specialization: input.specialization,
        qualification: input.qualification,
        hospital_name: input.hospital_name,
    };
    let key = doctor_key(&wallet);
    env.storage().persistent().set(&key, &profile);
    extend_persistent(env, &key);

    events::publish_user_registered(env, wallet, user.id, Role::Doctor);
    Ok(user)
}

pub fn load_user(env: &Env, wallet: &Address) -> Option<User> {
    let key = user_key(wallet);
    let user: Option<User> = env.storage().persistent().get(&key);
    if user.is_some() {
        extend_persistent(env, &key);
    }
    user
}

pub fn get_user(env: &Env, wallet: Address) -> Result<User, ContractError> {
    load_user(env, &wallet).ok_or(ContractError::NotFound)
}

pub fn get_user_by_id(env: &Env, id: u64) -> Result<User, ContractError> {
    let wallet: Address = env
        .storage()
        .persistent()
        .get(&user_id_key(id))
        .ok_or(ContractError::NotFound)?;
    load_user(env, &wallet).ok_or(ContractError::StorageUnavailable)
}

pub fn get_patient_profile(env: &Env, wallet: Address) -> Result<PatientProfile, ContractError> {
    env.storage()
        .persistent()
        .get(&patient_key(&wallet))
        .ok_or(ContractError::NotFound)
}

pub fn get_doctor_profile(env: &Env, wallet: Address) -> Result<DoctorProfile, ContractError> {
    env.storage()
        .persistent()
        .get(&doctor_key(&wallet))
        .ok_or(ContractError::NotFound)
}

/// `NotFound` unless `wallet` has a patient profile.
pub fn require_patient(env: &Env, wallet: &Address) -> Result<(), ContractError> {
    if !env.storage().persistent().has(&patient_key(wallet)) {
        return Err(ContractError::NotFound);
    }
    Ok(())
}

/// `NotFound` for an unknown address, `Forbidden` for a registered non-doctor.
pub fn require_doctor(env: &Env, wallet: &Address) -> Result<User, ContractError> {
    let user = load_user(env, wallet).ok_or(ContractError::NotFound)?;
    if user.role != Role::Doctor {
        return Err(ContractError::Forbidden);
    }
    Ok(user)
}

pub fn update_user(env: &Env, wallet: Address, update: UserUpdate) -> Result<User, ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    let mut user = load_user(env, &wallet).ok_or(ContractError::NotFound)?;
    validate_contact(&update.full_name, &update.phone, &update.date_of_birth)?;

    user.full_name = update.full_name;
    user.phone = update.phone;
    user.gender = update.gender;
    user.date_of_birth = update.date_of_birth;
    user.updated_at = env.ledger().timestamp();
    env.storage().persistent().set(&user_key(&wallet), &user);

    events::publish_user_updated(env, wallet);
    Ok(user)
}

pub fn update_patient_profile(
    env: &Env,
    wallet: Address,
    update: PatientProfileUpdate,
) -> Result<PatientProfile, ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    let key = patient_key(&wallet);
    let mut profile: PatientProfile = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::NotFound)?;
    validate_patient_details(
        &update.address,
        &update.medical_history,
        &update.medical_record_file,
    )?;

    profile.address = update.address;
    profile.blood_group = update.blood_group;
    profile.medical_history = update.medical_history;
    profile.medical_record_file = update.medical_record_file;
    env.storage().persistent().set(&key, &profile);
    extend_persistent(env, &key);

    let mut user = load_user(env, &wallet).ok_or(ContractError::StorageUnavailable)?;
    user.updated_at = env.ledger().timestamp();
    env.storage().persistent().set(&user_key(&wallet), &user);

    audit::append(env, &wallet, &wallet, AccessAction::ProfileUpdated, None, None);
    events::publish_user_updated(env, wallet);
    Ok(profile)
}

fn list_directory(
    env: &Env,
    role: Role,
    offset: u32,
    limit: u32,
) -> Result<Vec<User>, ContractError> {
    let wallets: Vec<Address> = env
        .storage()
        .persistent()
        .get(&directory_key(role))
        .unwrap_or(Vec::new(env));

    let mut users = Vec::new(env);
    for wallet in newest_first(env, &wallets, offset, config::page_limit(env, limit)).iter() {
        let user = load_user(env, &wallet).ok_or(ContractError::StorageUnavailable)?;
        users.push_back(user);
    }
    Ok(users)
}

/// Public doctor directory, newest registrations first.
pub fn list_doctors(env: &Env, offset: u32, limit: u32) -> Result<Vec<User>, ContractError> {
    config::require_initialized(env)?;
    list_directory(env, Role::Doctor, offset, limit)
}

/// Patient directory, newest registrations first. Registered doctors only.
pub fn list_patients(
    env: &Env,
    caller: Address,
    offset: u32,
    limit: u32,
) -> Result<Vec<User>, ContractError> {
    config::require_initialized(env)?;
    caller.require_auth();
    require_doctor(env, &caller).map_err(|_| ContractError::Forbidden)?;
    list_directory(env, Role::Patient, offset, limit)
}

/// Removes the user and everything it owns.
///
/// Patients take their records and grants with them. Doctors lose their
/// grants; records they authored stay with the patient, unattributed.
/// Audit entries are kept either way.
pub fn delete_user(env: &Env, wallet: Address) -> Result<(), ContractError> {
    config::require_initialized(env)?;
    wallet.require_auth();

    let user = load_user(env, &wallet).ok_or(ContractError::NotFound)?;

    match user.role {
        Role::Patient => {
            records::purge_patient(env, &wallet)?;
            ledger::purge_patient(env, &wallet);
            env.storage().persistent().remove(&patient_key(&wallet));
        }
        Role::Doctor => {
            records::detach_doctor(env, &wallet)?;
            ledger::purge_doctor(env, &wallet);
            if let Some(profile) = env
                .storage()
                .persistent()
                .get::<_, DoctorProfile>(&doctor_key(&wallet))
            {
                env.storage()
                    .persistent()
                    .remove(&license_key(&profile.medical_id));
            }
            env.storage().persistent().remove(&doctor_key(&wallet));
        }
    }

    env.storage().persistent().remove(&email_key(&user.email));
    env.storage().persistent().remove(&user_id_key(user.id));
    env.storage().persistent().remove(&user_key(&wallet));
    remove_from_directory(env, user.role, &wallet);
    session::clear(env, &wallet);

    events::publish_user_deleted(env, wallet, user.role);
    Ok(())
}
