use ark_serialize::SerializationError;
use ark_std::fmt::Debug;

/// Errors for caller misuse during proof construction. Cryptographic invalidity of a proof is
/// never an error, it is reported as a boolean by the verification functions.
#[derive(Debug)]
pub enum IssuanceError {
    /// The anonymity set must have at least 1 candidate
    NoCandidates,
    /// Secret index and size of the anonymity set
    SecretIndexOutOfBounds(usize, usize),
    /// No candidate's issuance key corresponds to the given secret key
    SecretKeyNotInCandidates,
    Serialization(SerializationError),
}

impl From<SerializationError> for IssuanceError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
