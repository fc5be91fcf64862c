//! Credential codec: salted digests, keyed transforms, and salt generation.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256, Sha512};

use super::error::Error;

/// Salt length used for stored passwords and token seeds.
pub const SALT_LENGTH: usize = 10;

/// Characters a generated salt is drawn from.
pub const SALT_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789/!?-=^~|[{]}@`:*";

/// One-way digest of `input`, hex encoded.
///
/// `algorithm` is a configured name ("sha256" or "sha512"); anything else
/// fails with `UnsupportedAlgorithm`.
pub fn hash(algorithm: &str, input: &str) -> Result<String, Error> {
    match algorithm {
        "sha256" => Ok(hex::encode(Sha256::digest(input.as_bytes()))),
        "sha512" => Ok(hex::encode(Sha512::digest(input.as_bytes()))),
        other => Err(Error::UnsupportedAlgorithm(other.to_string())),
    }
}

/// Deterministic keyed transform of `input` under `key_material`, hex encoded.
///
/// Used both to obfuscate stored passwords and to derive session tokens.
pub fn encrypt(algorithm: &str, key_material: &str, input: &str) -> Result<String, Error> {
    // HMAC accepts any key length, so new_from_slice cannot fail here.
    match algorithm {
        "sha256" => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key_material.as_bytes())
                .map_err(|_| Error::UnsupportedAlgorithm(algorithm.to_string()))?;
            mac.update(input.as_bytes());
            Ok(hex::encode(mac.finalize().into_bytes()))
        }
        "sha512" => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key_material.as_bytes())
                .map_err(|_| Error::UnsupportedAlgorithm(algorithm.to_string()))?;
            mac.update(input.as_bytes());
            Ok(hex::encode(mac.finalize().into_bytes()))
        }
        other => Err(Error::UnsupportedAlgorithm(other.to_string())),
    }
}

/// Generate a salt of [`SALT_LENGTH`] characters from [`SALT_CHARSET`].
///
/// Randomness comes from `rand::thread_rng`. The original service sampled a
/// non-cryptographic source here and nothing downstream depends on salts
/// being unpredictable, so this is deliberately not a hardened generator.
#[must_use]
pub fn generate_salt() -> String {
    salt_with(SALT_LENGTH, SALT_CHARSET)
}

/// Sample `length` characters independently with replacement from `charset`.
#[must_use]
pub fn salt_with(length: usize, charset: &str) -> String {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{encrypt, generate_salt, hash, salt_with, SALT_CHARSET, SALT_LENGTH};
    use crate::auth::error::Error;

    #[test]
    fn hash_is_deterministic() {
        let first = hash("sha256", "S1").expect("sha256 digest");
        let second = hash("sha256", "S1").expect("sha256 digest");
        let different = hash("sha256", "S2").expect("sha256 digest");
        assert_eq!(first, second);
        assert_ne!(first, different);
        // hex of a 32-byte digest
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn sha512_digest_is_longer() {
        let digest = hash("sha512", "S1").expect("sha512 digest");
        assert_eq!(digest.len(), 128);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        assert!(matches!(
            hash("md5", "S1"),
            Err(Error::UnsupportedAlgorithm(name)) if name == "md5"
        ));
        assert!(matches!(
            encrypt("rot13", "key", "secret"),
            Err(Error::UnsupportedAlgorithm(name)) if name == "rot13"
        ));
    }

    #[test]
    fn encrypt_depends_on_key_and_input() {
        let base = encrypt("sha256", "key", "secret").expect("keyed transform");
        let same = encrypt("sha256", "key", "secret").expect("keyed transform");
        let other_key = encrypt("sha256", "other", "secret").expect("keyed transform");
        let other_input = encrypt("sha256", "key", "other").expect("keyed transform");
        assert_eq!(base, same);
        assert_ne!(base, other_key);
        assert_ne!(base, other_input);
    }

    #[test]
    fn salt_has_configured_length_and_charset() {
        for _ in 0..200 {
            let salt = generate_salt();
            assert_eq!(salt.chars().count(), SALT_LENGTH);
            assert!(salt.chars().all(|c| SALT_CHARSET.contains(c)));
        }
    }

    #[test]
    fn salts_differ_with_overwhelming_probability() {
        let salts: std::collections::HashSet<String> =
            (0..100).map(|_| generate_salt()).collect();
        // 78^10 possibilities; 100 draws colliding down to a handful would
        // mean the sampler is broken.
        assert!(salts.len() > 90);
    }

    #[test]
    fn salt_with_empty_charset_is_empty() {
        assert_eq!(salt_with(10, ""), "");
    }
}
