/// Ed25519 public key size in bytes
pub const PUBKEY_SIZE: usize = 32;

/// Ed25519 secret key size in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Maximum display name length in UTF-8 bytes
pub const MAX_NAME_LEN: usize = 32;

/// Maximum message content length in UTF-8 bytes
pub const MAX_MESSAGE_LEN: usize = 256;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// How far a signed call's timestamp may drift from the host clock
pub const DEFAULT_MAX_CLOCK_SKEW_SECS: i64 = 300;
