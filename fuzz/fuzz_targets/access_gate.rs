#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};
use medchain::{
    AccessAction, BloodGroup, ContractConfig, DoctorRegistration, Gender, MedChainContract,
    MedChainContractClient, PatientRegistration,
};

const PATIENTS: usize = 2;
const DOCTORS: usize = 2;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Request { doctor: u8, patient: u8 },
    Grant { caller: u8, doctor: u8, patient: u8, expires_in: Option<u16> },
    Revoke { caller: u8, doctor: u8, patient: u8 },
    Authorize { actor: u8, patient: u8, emergency: bool },
    Advance { seconds: u16 },
}

fn patient_input(env: &Env, i: usize) -> PatientRegistration {
    PatientRegistration {
        full_name: String::from_str(env, "Fuzz Patient"),
        email: String::from_str(env, &format!("patient{}@fuzz.example", i)),
        phone: None,
        gender: Gender::Unspecified,
        date_of_birth: None,
        address: String::from_str(env, ""),
        blood_group: BloodGroup::Unknown,
        medical_history: String::from_str(env, ""),
        medical_record_file: None,
    }
}

fn doctor_input(env: &Env, i: usize) -> DoctorRegistration {
    DoctorRegistration {
        full_name: String::from_str(env, "Fuzz Doctor"),
        email: String::from_str(env, &format!("doctor{}@fuzz.example", i)),
        phone: None,
        gender: Gender::Unspecified,
        date_of_birth: None,
        medical_id: String::from_str(env, &format!("FZ-{}", i)),
        specialization: String::from_str(env, "General"),
        qualification: String::from_str(env, "MD"),
        hospital_name: String::from_str(env, "Fuzz Clinic"),
    }
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let contract_id = env.register(MedChainContract, ());
    let client = MedChainContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &ContractConfig::default());

    let patients: Vec<Address> = (0..PATIENTS)
        .map(|i| {
            let wallet = Address::generate(&env);
            client.register_patient(&wallet, &patient_input(&env, i));
            wallet
        })
        .collect();
    let doctors: Vec<Address> = (0..DOCTORS)
        .map(|i| {
            let wallet = Address::generate(&env);
            client.register_doctor(&wallet, &doctor_input(&env, i));
            wallet
        })
        .collect();
    let everyone: Vec<Address> = patients.iter().chain(doctors.iter()).cloned().collect();

    for action in actions {
        let before = client.audit_count();
        match action {
            FuzzAction::Request { doctor, patient } => {
                let doctor = &doctors[doctor as usize % DOCTORS];
                let patient = &patients[patient as usize % PATIENTS];
                client.request_access(doctor, patient);
                assert_eq!(client.audit_count(), before + 1);
            }
            FuzzAction::Grant {
                caller,
                doctor,
                patient,
                expires_in,
            } => {
                let caller = &everyone[caller as usize % everyone.len()];
                let doctor = &doctors[doctor as usize % DOCTORS];
                let patient = &patients[patient as usize % PATIENTS];
                let expires_at =
                    expires_in.map(|secs| env.ledger().timestamp() + u64::from(secs));

                let result = client.try_grant(caller, patient, doctor, &expires_at);
                // Only the owning patient can grant, and a failed call leaves no trace.
                assert_eq!(result.is_ok(), caller == patient);
                let expected = if result.is_ok() { before + 1 } else { before };
                assert_eq!(client.audit_count(), expected);
            }
            FuzzAction::Revoke {
                caller,
                doctor,
                patient,
            } => {
                let caller = &everyone[caller as usize % everyone.len()];
                let doctor = &doctors[doctor as usize % DOCTORS];
                let patient = &patients[patient as usize % PATIENTS];

                let result = client.try_revoke(caller, patient, doctor);
                if result.is_ok() {
                    assert_eq!(caller, patient);
                    assert!(!client.get_grant(patient, doctor).unwrap().granted);
                }
            }
            FuzzAction::Authorize {
                actor,
                patient,
                emergency,
            } => {
                let actor = &everyone[actor as usize % everyone.len()];
                let patient = &patients[patient as usize % PATIENTS];
                let action = if emergency {
                    AccessAction::EmergencyAccess
                } else {
                    AccessAction::View
                };

                let decision = client.authorize(actor, patient, &action);
                assert_eq!(client.audit_count(), before + 1);

                if actor != patient && doctors.contains(actor) {
                    let now = env.ledger().timestamp();
                    let active = client.get_grant(patient, actor).map_or(false, |grant| {
                        grant.granted && grant.expires_at.map_or(true, |at| at > now)
                    });
                    assert_eq!(decision.allowed, emergency || active);
                    assert_eq!(decision.requires_review, emergency);
                } else if actor != patient {
                    assert!(!decision.allowed);
                } else {
                    assert!(decision.allowed);
                }
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(seconds));
            }
        }
    }
});
