#![allow(dead_code)]

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};
use medchain::{
    BloodGroup, ContractConfig, DoctorRegistration, Gender, MedChainContract,
    MedChainContractClient, NewRecord, PatientRegistration, RecordType,
};

pub const GENESIS: u64 = 1_700_000_000;
pub const HOUR: u64 = 3_600;

pub struct TestContext {
    pub env: Env,
    pub client: MedChainContractClient<'static>,
    pub admin: Address,
}

/// Creates a mocked Soroban environment, deploys the contract, and initializes admin.
pub fn setup_test_env() -> TestContext {
    setup_with_config(ContractConfig::default())
}

pub fn setup_with_config(config: ContractConfig) -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(GENESIS);

    let contract_id = env.register(MedChainContract, ());
    let client = MedChainContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &config);

    TestContext { env, client, admin }
}

pub fn advance_time(ctx: &TestContext, seconds: u64) {
    let now = ctx.env.ledger().timestamp();
    ctx.env.ledger().set_timestamp(now + seconds);
}

pub fn now(ctx: &TestContext) -> u64 {
    ctx.env.ledger().timestamp()
}

pub fn patient_registration(env: &Env, name: &str, email: &str) -> PatientRegistration {
    PatientRegistration {
        full_name: String::from_str(env, name),
        email: String::from_str(env, email),
        phone: Some(String::from_str(env, "+1 555-0100")),
        gender: Gender::Unspecified,
        date_of_birth: Some(String::from_str(env, "1990-04-12")),
        address: String::from_str(env, "12 Harbour Road"),
        blood_group: BloodGroup::Unknown,
        medical_history: String::from_str(env, "None reported"),
        medical_record_file: None,
    }
}

pub fn doctor_registration(
    env: &Env,
    name: &str,
    email: &str,
    medical_id: &str,
) -> DoctorRegistration {
    DoctorRegistration {
        full_name: String::from_str(env, name),
        email: String::from_str(env, email),
        phone: None,
        gender: Gender::Unspecified,
        date_of_birth: None,
        medical_id: String::from_str(env, medical_id),
        specialization: String::from_str(env, "Cardiology"),
        qualification: String::from_str(env, "MD"),
        hospital_name: String::from_str(env, "St. Mary General"),
    }
}

/// Registers a patient with a unique email derived from `tag` and returns its wallet.
pub fn register_test_patient(ctx: &TestContext, tag: &str) -> Address {
    let wallet = Address::generate(&ctx.env);
    let email = format!("{}@patients.example", tag);
    ctx.client.register_patient(
        &wallet,
        &patient_registration(&ctx.env, "Test Patient", &email),
    );
    wallet
}

/// Registers a doctor with a unique email and license derived from `tag`.
pub fn register_test_doctor(ctx: &TestContext, tag: &str) -> Address {
    let wallet = Address::generate(&ctx.env);
    let email = format!("{}@clinic.example", tag);
    let license = format!("LIC-{}", tag);
    ctx.client.register_doctor(
        &wallet,
        &doctor_registration(&ctx.env, "Dr Test", &email, &license),
    );
    wallet
}

pub fn new_record(env: &Env, title: &str, record_type: RecordType) -> NewRecord {
    NewRecord {
        title: String::from_str(env, title),
        content: String::from_str(env, "Observations and plan"),
        record_type,
        file_reference: None,
    }
}

/// A patient and a doctor who holds an open-ended grant on that patient.
pub fn granted_pair(ctx: &TestContext, tag: &str) -> (Address, Address) {
    let patient = register_test_patient(ctx, &format!("p-{}", tag));
    let doctor = register_test_doctor(ctx, &format!("d-{}", tag));
    ctx.client.grant(&patient, &patient, &doctor, &None);
    (patient, doctor)
}
