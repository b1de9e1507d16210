//! Signed internal auth tokens.
//!
//! Wire format: `b64url(json(payload)) "." b64url(hmac_sha256(secret, b64url(json(payload))))`,
//! base64url without padding on both sides. The token has no expiry of its own;
//! lifetime is bounded by the cookie's `Max-Age`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::errors::{TokenError, VerifyError};
use super::signature;
use super::types::{AuthPayload, SigningSecret};

const SEPARATOR: char = '.';

/// The two raw halves of a token, before any authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub encoded_payload: &'a str,
    pub signature: &'a str,
}

/// Serialize and sign `payload`. Deterministic for a given payload and secret.
pub fn encode_auth_token(
    payload: &AuthPayload,
    secret: &SigningSecret,
) -> Result<String, TokenError> {
    let json = serde_json::to_vec(payload)?;
    let encoded_payload = URL_SAFE_NO_PAD.encode(json);
    let signature = signature::sign(&encoded_payload, secret)?;
    Ok(format!("{}{}{}", encoded_payload, SEPARATOR, signature))
}

/// Split a token into its two parts without looking inside either.
pub fn decode_auth_token(token: &str) -> Result<TokenParts<'_>, VerifyError> {
    let mut parts = token.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(encoded_payload), Some(signature), None)
            if !encoded_payload.is_empty() && !signature.is_empty() =>
        {
            Ok(TokenParts {
                encoded_payload,
                signature,
            })
        }
        _ => Err(VerifyError::InvalidFormat),
    }
}

/// Authenticate a raw cookie value and return the identity it carries.
///
/// The payload is only base64-decoded and parsed after the signature checks
/// out. This authenticates; it does not authorize. Callers must still run
/// `is_authorized_email` on the result.
pub fn verify_auth_token(token: &str, secret: &SigningSecret) -> Result<AuthPayload, VerifyError> {
    if token.is_empty() {
        return Err(VerifyError::Empty);
    }

    let parts = decode_auth_token(token)?;

    if !signature::verify(parts.encoded_payload, parts.signature, secret) {
        return Err(VerifyError::InvalidSignature);
    }

    let json = URL_SAFE_NO_PAD
        .decode(parts.encoded_payload)
        .map_err(|_| VerifyError::InvalidPayload)?;
    let payload: AuthPayload =
        serde_json::from_slice(&json).map_err(|_| VerifyError::InvalidPayload)?;

    if payload.email.is_empty() {
        return Err(VerifyError::InvalidPayload);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";

    fn secret() -> SigningSecret {
        SigningSecret::new(TEST_SECRET).unwrap()
    }

    fn payload(email: &str, name: &str) -> AuthPayload {
        AuthPayload {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    fn sign_raw(encoded_payload: &str) -> String {
        let sig = signature::sign(encoded_payload, &secret()).unwrap();
        format!("{}.{}", encoded_payload, sig)
    }

    #[test]
    fn test_known_answer_vector() {
        let token = encode_auth_token(
            &payload("grants-team@ethereum.org", "Grants Team"),
            &secret(),
        )
        .unwrap();

        assert_eq!(
            token,
            "eyJlbWFpbCI6ImdyYW50cy10ZWFtQGV0aGVyZXVtLm9yZyIsIm5hbWUiOiJHcmFudHMgVGVhbSJ9\
             .2kSsT3tJgLDyZYqUL7IePj5DR6jngKw_GP3XBTntuCE"
        );
    }

    #[test]
    fn test_round_trip() {
        let original = payload("team+grants@ethereum.org", "Team Grants");
        let token = encode_auth_token(&original, &secret()).unwrap();
        assert_eq!(verify_auth_token(&token, &secret()), Ok(original));
    }

    #[test]
    fn test_round_trip_preserves_unicode_and_separator_in_fields() {
        let original = payload("jose.maria@ethereum.org", "José María. Ñ");
        let token = encode_auth_token(&original, &secret()).unwrap();
        assert_eq!(token.matches('.').count(), 1);
        assert_eq!(verify_auth_token(&token, &secret()), Ok(original));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let p = payload("alice@ethereum.org", "Alice");
        assert_eq!(
            encode_auth_token(&p, &secret()).unwrap(),
            encode_auth_token(&p, &secret()).unwrap()
        );
    }

    #[test]
    fn test_different_secrets_give_different_tokens() {
        let p = payload("alice@ethereum.org", "Alice");
        let other = SigningSecret::new("another-signing-secret-9876543210fedcba").unwrap();
        assert_ne!(
            encode_auth_token(&p, &secret()).unwrap(),
            encode_auth_token(&p, &other).unwrap()
        );
    }

    #[test]
    fn test_unsigned_payload_is_rejected() {
        let forged = URL_SAFE_NO_PAD.encode(r#"{"email":"evil@ethereum.org","name":"Evil"}"#);
        assert_eq!(
            verify_auth_token(&forged, &secret()),
            Err(VerifyError::InvalidFormat)
        );

        let with_empty_sig = format!("{}.", forged);
        assert_eq!(
            verify_auth_token(&with_empty_sig, &secret()),
            Err(VerifyError::InvalidFormat)
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = SigningSecret::new("another-signing-secret-9876543210fedcba").unwrap();
        let token = encode_auth_token(&payload("evil@ethereum.org", "Evil"), &other).unwrap();

        let err = verify_auth_token(&token, &secret()).unwrap_err();
        assert_eq!(err, VerifyError::InvalidSignature);
        assert!(err.is_forgery());
    }

    #[test]
    fn test_swapped_payload_is_rejected() {
        let token = encode_auth_token(&payload("bob@gmail.com", "Bob"), &secret()).unwrap();
        let parts = decode_auth_token(&token).unwrap();
        let swapped = URL_SAFE_NO_PAD.encode(r#"{"email":"bob@ethereum.org","name":"Bob"}"#);

        let tampered = format!("{}.{}", swapped, parts.signature);
        assert_eq!(
            verify_auth_token(&tampered, &secret()),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn test_trailing_tamper_is_rejected() {
        let token = encode_auth_token(&payload("alice@ethereum.org", "Alice"), &secret()).unwrap();

        for n in 1..=4 {
            let keep = token.len() - n;
            let replacement: String = token[keep..]
                .chars()
                .map(|c| if c == 'A' { 'B' } else { 'A' })
                .collect();
            let tampered = format!("{}{}", &token[..keep], replacement);
            assert!(verify_auth_token(&tampered, &secret()).is_err(), "n = {}", n);
        }
    }

    #[test]
    fn test_empty_and_malformed_tokens() {
        assert_eq!(verify_auth_token("", &secret()), Err(VerifyError::Empty));
        assert_eq!(
            verify_auth_token("not-a-valid-token!!!", &secret()),
            Err(VerifyError::InvalidFormat)
        );
        assert_eq!(
            verify_auth_token("a.b.c", &secret()),
            Err(VerifyError::InvalidFormat)
        );
        assert_eq!(
            verify_auth_token(".sig", &secret()),
            Err(VerifyError::InvalidFormat)
        );
    }

    #[test]
    fn test_signed_non_json_payload() {
        let token = sign_raw(&URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(
            verify_auth_token(&token, &secret()),
            Err(VerifyError::InvalidPayload)
        );
    }

    #[test]
    fn test_signed_non_base64_payload() {
        let token = sign_raw("!!!");
        assert_eq!(
            verify_auth_token(&token, &secret()),
            Err(VerifyError::InvalidPayload)
        );
    }

    #[test]
    fn test_signed_payload_with_empty_email() {
        let token = sign_raw(&URL_SAFE_NO_PAD.encode(r#"{"email":"","name":"Nobody"}"#));
        assert_eq!(
            verify_auth_token(&token, &secret()),
            Err(VerifyError::InvalidPayload)
        );
    }

    #[test]
    fn test_decode_returns_raw_parts() {
        let parts = decode_auth_token("abc.def").unwrap();
        assert_eq!(parts.encoded_payload, "abc");
        assert_eq!(parts.signature, "def");
    }
}
