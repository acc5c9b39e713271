//! Checkout payment signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with the key secret using
//! HMAC-SHA256 and sends the hex digest back through the client. We
//! recompute and compare in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the expected checkout signature for an order/payment pair.
pub fn checkout_signature(key_secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a client-submitted checkout signature.
pub fn verify_checkout_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    provided: &str,
) -> bool {
    let expected = checkout_signature(key_secret, order_id, payment_id);
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

/// Constant-time comparison of two byte slices.
///
/// Prevents timing attacks that could leak the expected signature.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
