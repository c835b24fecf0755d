use medchain_common::{all_bytes, is_printable, with_bytes};
use soroban_sdk::String;

use crate::ContractError;

const MIN_NAME_LEN: u32 = 2;
const MAX_NAME_LEN: u32 = 64;

const MAX_EMAIL_LEN: u32 = 254;

const MIN_PHONE_LEN: u32 = 7;
const MAX_PHONE_LEN: u32 = 20;

const MIN_MEDICAL_ID_LEN: u32 = 2;
pub const MAX_MEDICAL_ID_LEN: u32 = 32;

const MAX_LABEL_LEN: u32 = 128;
const MAX_FILE_REF_LEN: u32 = 255;
const MAX_DETAIL_LEN: u32 = 256;

pub const MAX_TEXT_LEN: u32 = 4096;

/// Validate a user's display name.
/// Names must be between MIN_NAME_LEN and MAX_NAME_LEN bytes of printable ASCII.
pub fn validate_name(name: &String) -> Result<(), ContractError> {
    let len = name.len();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
        || !all_bytes::<{ MAX_NAME_LEN as usize }>(name, is_printable)
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate an email address: one `@`, a non-empty local part, and a dotted
/// domain that neither starts nor ends with a dot.
pub fn validate_email(email: &String) -> Result<(), ContractError> {
    let valid = with_bytes::<{ MAX_EMAIL_LEN as usize }, _>(email, |bytes| {
        if bytes.iter().any(|&b| !is_printable(b) || b == b' ') {
            return false;
        }
        let mut parts = bytes.split(|&b| b == b'@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => (local, domain),
            _ => return false,
        };
        !local.is_empty()
            && domain.contains(&b'.')
            && domain.first() != Some(&b'.')
            && domain.last() != Some(&b'.')
    })
    .unwrap_or(false);

    if !valid {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate a phone number: digits plus `+ - ( )` and spaces.
pub fn validate_phone(phone: &String) -> Result<(), ContractError> {
    let len = phone.len();
    let allowed = |b: u8| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'(' | b')' | b' ');
    if !(MIN_PHONE_LEN..=MAX_PHONE_LEN).contains(&len)
        || !all_bytes::<{ MAX_PHONE_LEN as usize }>(phone, allowed)
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate a calendar date in `YYYY-MM-DD` form.
/// Month must be 1-12 and day 1-31; month lengths are not checked.
pub fn validate_date(date: &String) -> Result<(), ContractError> {
    let valid = with_bytes::<10, _>(date, |b| {
        if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
            return false;
        }
        let digits = [0, 1, 2, 3, 5, 6, 8, 9];
        if !digits.iter().all(|&i| b[i].is_ascii_digit()) {
            return false;
        }
        let month = (b[5] - b'0') * 10 + (b[6] - b'0');
        let day = (b[8] - b'0') * 10 + (b[9] - b'0');
        (1..=12).contains(&month) && (1..=31).contains(&day)
    })
    .unwrap_or(false);

    if !valid {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate a doctor's medical license id: `[A-Za-z0-9_/-]`.
pub fn validate_medical_id(medical_id: &String) -> Result<(), ContractError> {
    let len = medical_id.len();
    let allowed = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/');
    if !(MIN_MEDICAL_ID_LEN..=MAX_MEDICAL_ID_LEN).contains(&len)
        || !all_bytes::<{ MAX_MEDICAL_ID_LEN as usize }>(medical_id, allowed)
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate a short label such as a title, specialization or hospital name.
pub fn validate_label(label: &String) -> Result<(), ContractError> {
    let len = label.len();
    if !(1..=MAX_LABEL_LEN).contains(&len)
        || !all_bytes::<{ MAX_LABEL_LEN as usize }>(label, is_printable)
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate a reference to an uploaded file (a stored file name or content hash).
/// We restrict to `[A-Za-z0-9._/-]` so the reference cannot carry markup.
pub fn validate_file_reference(file_ref: &String) -> Result<(), ContractError> {
    let len = file_ref.len();
    let allowed = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b'/');
    if !(1..=MAX_FILE_REF_LEN).contains(&len)
        || !all_bytes::<{ MAX_FILE_REF_LEN as usize }>(file_ref, allowed)
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Free text (addresses, medical history, record content) is only length-checked.
pub fn validate_text(text: &String) -> Result<(), ContractError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Validate the optional free-text detail of an audit entry.
pub fn validate_detail(detail: &String) -> Result<(), ContractError> {
    if detail.len() > MAX_DETAIL_LEN {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}
