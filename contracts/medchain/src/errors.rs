use soroban_sdk::contracterror;

/// Error categories for classifying contract failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Invalid input parameters or malformed requests
    Validation,
    /// The caller may not perform the operation
    Authorization,
    /// Resource lookup failures
    NotFound,
    /// Duplicate registrations and other state clashes
    StateConflict,
    /// Inconsistent or missing storage entries
    Storage,
    /// Contract lifecycle issues
    System,
}

/// Error severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorSeverity {
    /// Rejected request, nothing changed
    Low = 1,
    /// The caller lacks the rights for the operation
    Medium = 2,
    /// Stored state is inconsistent
    High = 3,
}

/// Contract errors.
///
/// A denied access decision is not an error: the gate reports it as a
/// `Decision` with `allowed = false`. These codes cover malformed requests
/// and storage faults.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotFound = 3,
    Forbidden = 4,
    InvalidAction = 5,
    Conflict = 6,
    StorageUnavailable = 7,
    InvalidInput = 8,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::InvalidAction | ContractError::InvalidInput => {
                ErrorCategory::Validation
            }
            ContractError::Forbidden => ErrorCategory::Authorization,
            ContractError::NotFound => ErrorCategory::NotFound,
            ContractError::Conflict | ContractError::AlreadyInitialized => {
                ErrorCategory::StateConflict
            }
            ContractError::StorageUnavailable => ErrorCategory::Storage,
            ContractError::NotInitialized => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::NotFound
            | ContractError::InvalidAction
            | ContractError::Conflict
            | ContractError::InvalidInput => ErrorSeverity::Low,
            ContractError::Forbidden => ErrorSeverity::Medium,
            ContractError::StorageUnavailable => ErrorSeverity::High,
        }
    }

    /// The contract never retries internally. `grant` and `revoke` carry no
    /// idempotency key, so retry policy belongs to the caller.
    pub fn retryable(&self) -> bool {
        false
    }

    /// Returns a human-readable error message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::NotFound => "Requested user, patient, record or grant does not exist",
            ContractError::Forbidden => "Caller is not allowed to perform this operation",
            ContractError::InvalidAction => "Action tag is not part of the audit vocabulary",
            ContractError::Conflict => "Wallet, email or license id is already registered",
            ContractError::StorageUnavailable => "Storage entry is missing or inconsistent",
            ContractError::InvalidInput => "Invalid input parameters provided",
        }
    }
}
