//! HMAC-SHA256 signing and constant-time signature verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::errors::TokenError;
use super::types::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(encoded_payload: &str, secret: &SigningSecret) -> Result<HmacSha256, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::InvalidKey)?;
    mac.update(encoded_payload.as_bytes());
    Ok(mac)
}

/// Sign the encoded payload exactly as it will be transmitted.
pub fn sign(encoded_payload: &str, secret: &SigningSecret) -> Result<String, TokenError> {
    let tag = mac_for(encoded_payload, secret)?.finalize().into_bytes();
    Ok(URL_SAFE_NO_PAD.encode(tag))
}

/// Check `signature` against the HMAC of `encoded_payload`.
///
/// The comparison goes through `Mac::verify_slice`, which rejects a tag of the
/// wrong length and otherwise compares in constant time. A signature that is
/// not valid unpadded base64url is simply a failed verification.
pub fn verify(encoded_payload: &str, signature: &str, secret: &SigningSecret) -> bool {
    let Ok(provided) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };

    match mac_for(encoded_payload, secret) {
        Ok(mac) => mac.verify_slice(&provided).is_ok(),
        Err(_) => false,
    }
}
