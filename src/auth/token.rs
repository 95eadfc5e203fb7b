use crate::error::AppError;
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Raw entropy per token. 32 bytes hex-encode to a 64-character string.
const TOKEN_BYTES: usize = 32;

/// Generates an opaque session token from the operating system's
/// cryptographically secure random source.
///
/// Tokens are fixed-length (64 lowercase hex characters, 256 bits of
/// entropy) and carry no structure: all session state lives in the
/// database row keyed by the token.
///
/// # Returns
/// A `Result` containing the token string, or `AppError::Internal` if the
/// system random source is unavailable.
pub fn generate_token() -> Result<String, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("failed to read system entropy: {}", e)))?;
    Ok(hex::encode(bytes))
}
