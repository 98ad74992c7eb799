use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `body` keyed with `secret`.
pub fn sign_payload(body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks an `X-Webhook-Signature` value against the body it claims to sign.
pub fn verify_signature(body: &[u8], secret: &str, signature: &str) -> bool {
    let expected = sign_payload(body, secret);
    let provided = signature.trim().to_ascii_lowercase();
    ConstantTimeEq::ct_eq(expected.as_bytes(), provided.as_bytes()).into()
}
