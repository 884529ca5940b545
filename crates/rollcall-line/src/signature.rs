//! Webhook signature verification.
//!
//! LINE signs every webhook delivery with an HMAC-SHA256 over the exact
//! raw request body, keyed by the channel secret, and sends the
//! base64-encoded digest in the `x-line-signature` header. Verification
//! recomputes the digest and compares in constant time.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the base64 HMAC-SHA256 digest LINE expects for `body`.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies a webhook signature against the channel secret.
///
/// Returns `false` for an empty secret or signature; a request that
/// cannot be verified must never be processed.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        return false;
    }

    let expected = compute_signature(secret, body);
    timing_safe_eq(expected.as_bytes(), signature.as_bytes())
}

/// Timing-safe comparison to prevent timing attacks.
///
/// Uses constant-time comparison to avoid leaking information about the
/// expected signature through timing analysis.
fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.iter().zip(b.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_digest_verifies() {
        // Precomputed HMAC-SHA256("test-channel-secret", '{"events":[]}').
        let signature = "sKRrt+MTE71nWWZPaYrvYSdH9JGlgckmBidZxDuPgPc=";
        assert!(verify_signature("test-channel-secret", b"{\"events\":[]}", signature));
    }

    #[test]
    fn compute_matches_known_vector() {
        assert_eq!(
            compute_signature("secret", b"hello world"),
            "c0zGLzKEFWj0VxWuufTXiRMk5tlI5MbGDAYhzaxIYjo="
        );
    }

    #[test]
    fn wrong_secret_rejected() {
        let signature = compute_signature("secret-a", b"payload");
        assert!(!verify_signature("secret-b", b"payload", &signature));
    }

    #[test]
    fn empty_secret_or_signature_rejected() {
        let signature = compute_signature("secret", b"payload");
        assert!(!verify_signature("", b"payload", &signature));
        assert!(!verify_signature("secret", b"payload", ""));
    }

    #[test]
    fn timing_safe_eq_basics() {
        assert!(timing_safe_eq(b"hello", b"hello"));
        assert!(!timing_safe_eq(b"hello", b"world"));
        assert!(!timing_safe_eq(b"hello", b"hello there"));
    }

    proptest! {
        #[test]
        fn any_body_mutation_invalidates_the_signature(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            flip_index in 0usize..256,
            flip_bit in 0u8..8,
        ) {
            let secret = "prop-secret";
            let signature = compute_signature(secret, &body);
            prop_assert!(verify_signature(secret, &body, &signature));

            let mut mutated = body.clone();
            let index = flip_index % mutated.len();
            mutated[index] ^= 1 << flip_bit;
            prop_assert!(!verify_signature(secret, &mutated, &signature));
        }
    }
}
