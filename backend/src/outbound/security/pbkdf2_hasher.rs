//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Hashes are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>` with the
//! salt and hash in unpadded standard base64. Verification reads the
//! iteration count from the stored value, so raising the default does not
//! invalidate existing hashes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

const SCHEME: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Iterations applied to new hashes.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 210_000;

/// `PasswordHasher` backed by PBKDF2-HMAC-SHA256.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2PasswordHasher {
    iterations: u32,
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PBKDF2_ITERATIONS)
    }
}

impl Pbkdf2PasswordHasher {
    /// Hasher applying `iterations` rounds to new hashes (at least one).
    #[must_use]
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LEN]> {
    let mut out = Zeroizing::new([0_u8; HASH_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, out.as_mut());
    out
}

struct StoredHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn parse_stored(encoded: &str) -> Result<StoredHash, PasswordHasherError> {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordHasherError::Malformed);
    };
    if scheme != SCHEME {
        return Err(PasswordHasherError::Malformed);
    }
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|rounds| *rounds > 0)
        .ok_or(PasswordHasherError::Malformed)?;
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| PasswordHasherError::Malformed)?;
    let hash = STANDARD_NO_PAD
        .decode(hash)
        .map_err(|_| PasswordHasherError::Malformed)?;
    if hash.is_empty() {
        return Err(PasswordHasherError::Malformed);
    }
    Ok(StoredHash {
        iterations,
        salt,
        hash,
    })
}

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng()
            .try_fill_bytes(&mut salt)
            .map_err(|error| PasswordHasherError::hash(error.to_string()))?;
        let derived = derive(password.expose().as_bytes(), &salt, self.iterations);
        Ok(PasswordHash::new(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(derived.as_ref()),
        )))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let stored = parse_stored(hash.as_str())?;
        if stored.hash.len() != HASH_LEN {
            return Err(PasswordHasherError::Malformed);
        }
        let derived = derive(candidate.as_bytes(), &stored.salt, stored.iterations);
        Ok(constant_time_eq(derived.as_ref(), &stored.hash))
    }
}
