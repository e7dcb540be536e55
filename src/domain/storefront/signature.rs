//! Payment callback signature verification.
//!
//! The gateway signs `order_id|payment_id` with HMAC-SHA256 under the shared
//! key secret and hands the hex digest to the payment widget. Recomputing and
//! comparing it is the only proof that a completion callback is genuine.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Verifier for payment completion signatures.
#[derive(Clone)]
pub struct PaymentSignatureVerifier {
    secret: Secret<String>,
}

impl PaymentSignatureVerifier {
    /// Creates a verifier over the gateway's key secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
        }
    }

    /// Computes the hex signature the gateway would produce.
    pub fn expected_signature(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Returns true when `signature` matches byte-for-byte.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let expected = self.expected_signature(order_id, payment_id);
        constant_time_compare(expected.as_bytes(), signature.as_bytes())
    }
}

impl std::fmt::Debug for PaymentSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSignatureVerifier").finish_non_exhaustive()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "rzp_test_secret_12345";

    #[test]
    fn matches_reference_hmac_over_pipe_joined_ids() {
        let verifier = PaymentSignatureVerifier::new("secret");
        let mut mac = Hmac::<Sha256>::new_from_slice(b"secret").unwrap();
        mac.update(b"order_X|pay_Y");
        let reference = hex::encode(mac.finalize().into_bytes());

        assert_eq!(verifier.expected_signature("order_X", "pay_Y"), reference);
        assert!(verifier.verify("order_X", "pay_Y", &reference));
    }

    #[test]
    fn signature_is_lowercase_hex_sha256() {
        let sig = PaymentSignatureVerifier::new(TEST_SECRET).expected_signature("o", "p");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn wrong_secret_fails() {
        let signer = PaymentSignatureVerifier::new(TEST_SECRET);
        let verifier = PaymentSignatureVerifier::new("another_secret");
        let sig = signer.expected_signature("order_1", "pay_1");
        assert!(!verifier.verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn swapped_ids_fail() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let sig = verifier.expected_signature("order_1", "pay_1");
        assert!(!verifier.verify("pay_1", "order_1", &sig));
    }

    #[test]
    fn uppercase_hex_is_not_accepted() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let sig = verifier.expected_signature("order_1", "pay_1").to_uppercase();
        assert!(!verifier.verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn empty_and_truncated_signatures_fail() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let sig = verifier.expected_signature("order_1", "pay_1");
        assert!(!verifier.verify("order_1", "pay_1", ""));
        assert!(!verifier.verify("order_1", "pay_1", &sig[..63]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
        assert!(constant_time_compare(&[], &[]));
    }

    proptest! {
        #[test]
        fn any_single_bit_flip_is_rejected(
            order_id in "order_[A-Za-z0-9]{14}",
            payment_id in "pay_[A-Za-z0-9]{14}",
            byte in 0usize..64,
            bit in 0u8..7,
        ) {
            let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
            let sig = verifier.expected_signature(&order_id, &payment_id);
            prop_assert!(verifier.verify(&order_id, &payment_id, &sig));

            // Bits 0..7 keep every byte ASCII, so the length never changes
            let mut bytes = sig.into_bytes();
            bytes[byte] ^= 1 << bit;
            let mutated = String::from_utf8(bytes).unwrap();
            prop_assert_eq!(mutated.len(), 64);
            prop_assert!(!verifier.verify(&order_id, &payment_id, &mutated));
        }
    }
}
