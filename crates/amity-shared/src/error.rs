use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid key bytes")]
    InvalidKeyBytes,

    #[error("Signature does not match the caller's key")]
    BadSignature,

    #[error("Malformed signature")]
    MalformedSignature,

    #[error("Call encoding error: {0}")]
    Encoding(String),
}

impl From<bincode::Error> for IdentityError {
    fn from(e: bincode::Error) -> Self {
        IdentityError::Encoding(e.to_string())
    }
}
