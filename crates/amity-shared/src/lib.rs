//! # amity-shared
//!
//! Types shared between the ledger core, the host server and any client
//! that submits calls: account addresses, signing keypairs, the call
//! vocabulary and the signed envelope that carries a call to the host.

pub mod constants;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod types;

pub use error::IdentityError;
pub use identity::Keypair;
pub use protocol::{Call, SignedCall};
pub use types::Address;
