//! API token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "am";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a raw bearer token. It is shown once and only its hash is stored.
#[must_use]
pub fn generate_api_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    let encoded: String = secret.iter().map(|byte| format!("{byte:02x}")).collect();

    secret.zeroize();

    format!("{API_TOKEN_PREFIX}_{encoded}")
}

/// Hex SHA-256 of a raw token, as stored in `api_tokens.token_hash`.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_prefixed_and_unique() {
        let first = generate_api_token();
        let second = generate_api_token();

        assert!(first.starts_with("am_"), "unexpected token {first}");
        assert_eq!(first.len(), 3 + API_TOKEN_SECRET_BYTES * 2);
        assert_ne!(first, second);
    }

    #[test]
    fn token_secret_is_lowercase_hex() {
        let token = generate_api_token();
        let secret = token.strip_prefix("am_").unwrap_or_default();

        assert!(
            secret
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "unexpected secret in {token}"
        );
    }

    #[test]
    fn hash_is_stable_hex_sha256() {
        assert_eq!(
            hash_api_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_api_token("abc"), hash_api_token("abc"));
    }
}
