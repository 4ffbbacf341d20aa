//! Webhook signature verification.
//!
//! Shopify signs every webhook delivery with HMAC-SHA256 over the raw
//! request body, base64-encoded in the `X-Shopify-Hmac-Sha256` header.
//! Verification compares in constant time.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 signature.
pub const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";
/// Header carrying the event topic, e.g. `orders/create`.
pub const TOPIC_HEADER: &str = "X-Shopify-Topic";
/// Header carrying the originating shop domain.
pub const SHOP_DOMAIN_HEADER: &str = "X-Shopify-Shop-Domain";

/// Compute the base64 HMAC-SHA256 signature of a raw body.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify a delivery signature using constant-time comparison.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let computed = compute_signature(secret, body);
    computed.as_bytes().ct_eq(signature.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = compute_signature("secret", b"{\"id\":1}");
        let b = compute_signature("secret", b"{\"id\":1}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_valid_signature_verifies() {
        let body = b"{\"id\":788032119,\"title\":\"Example T-Shirt\"}";
        let sig = compute_signature("hush", body);
        assert!(verify_signature("hush", body, &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"{}";
        let sig = compute_signature("secret-a", body);
        assert!(!verify_signature("secret-b", body, &sig));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let sig = compute_signature("hush", b"{\"total_price\":\"10.00\"}");
        assert!(!verify_signature("hush", b"{\"total_price\":\"99.00\"}", &sig));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(!verify_signature("hush", b"{}", "not-base64-at-all"));
    }
}
