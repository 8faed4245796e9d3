//! Webhook signature verification
//!
//! GitHub signs each delivery with HMAC-SHA-256 over the raw request body
//! and presents the digest as `sha256=<hex>` in the `X-Hub-Signature-256`
//! header. Verification happens over the exact bytes received, before the
//! body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the `sha256=<hex>` signature for a payload.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Checks a presented signature against the expected digest of the payload.
///
/// A length mismatch is rejected before the comparison; equal-length inputs
/// are compared in constant time. Malformed or missing input yields `false`,
/// never an error. Deterministic and side-effect-free.
pub fn verify(payload: &[u8], presented: &str, secret: &str) -> bool {
    let expected = sign(payload, secret);
    if presented.len() != expected.len() {
        return false;
    }
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
