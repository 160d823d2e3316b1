/// The validator's own identity is missing from the ledger.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("identity {identity} is not registered on the ledger")]
    NotRegistered { identity: String },

    #[error("identity {identity} not found in roster at height {height}")]
    NotInRoster { identity: String, height: u64 },
}
