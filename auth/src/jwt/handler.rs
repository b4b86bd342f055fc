use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use super::claims::Claims;
use super::errors::JwtError;
use super::errors::TokenError;

/// Algorithms accepted at validation time. Anything outside the HMAC family
/// (`none`, RSA, ECDSA, EdDSA) is refused before the signature is looked at.
const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// A token that passed every validation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Parsed `sub` claim
    pub subject: Uuid,
    pub claims: Claims,
}

/// JWT token handler for issuing and validating tokens.
///
/// Signs with HS256. The key is fixed at construction and never changes,
/// so one handler can be shared by every request.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `MissingSigningKey` - `secret` is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSigningKey);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token against the current time.
    ///
    /// See [`JwtHandler::validate_at`].
    pub fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate a token as of `now` (Unix seconds).
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. structure (three base64url segments, JSON header and payload)
    /// 2. declared algorithm belongs to the HMAC family
    /// 3. signature
    /// 4. expiry (`exp` strictly after `now`, no leeway)
    /// 5. subject is a UUID
    ///
    /// # Errors
    /// * `Malformed` - Step 1 failed, or the signed payload is not a claim set
    /// * `BadSignature` - Steps 2 or 3 failed
    /// * `Expired` - Step 4 failed
    /// * `BadSubject` - Step 5 failed
    pub fn validate_at(&self, token: &str, now: i64) -> Result<VerifiedToken, TokenError> {
        let declared = declared_algorithm(token)?;

        // Unknown names (`none`, wrong case) fail to parse and are refused too
        match Algorithm::from_str(&declared) {
            Ok(algorithm) if HMAC_FAMILY.contains(&algorithm) => {}
            _ => return Err(TokenError::BadSignature),
        }

        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = HMAC_FAMILY.to_vec();
        validation.required_spec_claims.clear();
        // Expiry is checked below, strictly and without leeway
        validation.validate_exp = false;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::BadSignature
                    }
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        let claims = token_data.claims;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        let subject =
            Uuid::parse_str(&claims.sub).map_err(|e| TokenError::BadSubject(e.to_string()))?;

        Ok(VerifiedToken { subject, claims })
    }
}

/// Parse the token structure and return the `alg` value from its header.
///
/// The header is read as plain JSON so that algorithm names jsonwebtoken does
/// not know about (such as `none`) still come back as a name to refuse.
fn declared_algorithm(token: &str) -> Result<String, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    };

    let header = decode_json_segment(header, "header")?;
    decode_json_segment(payload, "payload")?;
    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| TokenError::Malformed(format!("signature: {}", e)))?;

    header
        .get("alg")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| TokenError::Malformed("header has no alg".to_string()))
}

fn decode_json_segment(segment: &str, part: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("{}: {}", part, e)))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::Malformed(format!("{} is not a JSON object", part))),
        Err(e) => Err(TokenError::Malformed(format!("{}: {}", part, e))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn user_claims(ttl: Duration) -> Claims {
        Claims::for_user(Uuid::new_v4(), "Ann", "a@x.com", ttl).unwrap()
    }

    fn b64(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    /// Build a token with an arbitrary header, signed with HS256 over `SECRET`.
    fn forge(header: Value, payload: Value) -> String {
        let message = format!("{}.{}", b64(&header), b64(&payload));
        let signature = jsonwebtoken::crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(SECRET),
            Algorithm::HS256,
        )
        .unwrap();
        format!("{}.{}", message, signature)
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        assert!(matches!(
            JwtHandler::new(b""),
            Err(JwtError::MissingSigningKey)
        ));
    }

    #[test]
    fn test_encode_and_validate() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let claims = user_claims(Duration::days(7));

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let verified = handler.validate(&token).expect("Failed to validate token");
        assert_eq!(verified.subject.to_string(), claims.sub);
        assert_eq!(verified.claims, claims);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!").unwrap();
        let validator = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!").unwrap();

        let token = issuer.encode(&user_claims(Duration::days(7))).unwrap();

        assert_eq!(validator.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_validate_expired_token() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let claims = user_claims(Duration::seconds(60));
        let token = handler.encode(&claims).unwrap();

        assert!(handler.validate_at(&token, claims.exp - 1).is_ok());
        assert_eq!(
            handler.validate_at(&token, claims.exp),
            Err(TokenError::Expired)
        );
        assert_eq!(
            handler.validate_at(&token, claims.exp + 3600),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let issuer = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!").unwrap();
        let validator = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!").unwrap();
        let claims = user_claims(Duration::seconds(60));
        let token = issuer.encode(&claims).unwrap();

        assert_eq!(
            validator.validate_at(&token, claims.exp + 3600),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_validate_rejects_alg_none() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let claims = user_claims(Duration::days(7));

        let header = b64(&json!({ "alg": "none", "typ": "JWT" }));
        let payload = b64(&serde_json::to_value(&claims).unwrap());

        let unsigned = format!("{}.{}.", header, payload);
        assert_eq!(handler.validate(&unsigned), Err(TokenError::BadSignature));

        let with_signature = forge(
            json!({ "alg": "none", "typ": "JWT" }),
            serde_json::to_value(&claims).unwrap(),
        );
        assert_eq!(
            handler.validate(&with_signature),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_validate_rejects_asymmetric_algorithms() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let payload = serde_json::to_value(user_claims(Duration::days(7))).unwrap();

        for alg in ["RS256", "ES256", "PS512", "EdDSA", "hs256", "HS1024", ""] {
            let token = forge(json!({ "alg": alg, "typ": "JWT" }), payload.clone());
            assert_eq!(
                handler.validate(&token),
                Err(TokenError::BadSignature),
                "algorithm {} must be refused",
                alg
            );
        }
    }

    #[test]
    fn test_validate_accepts_other_hmac_variants() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let claims = user_claims(Duration::days(7));

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let verified = handler.validate(&token).expect("HS512 should be accepted");
        assert_eq!(verified.claims, claims);
    }

    #[test]
    fn test_validate_malformed_structure() {
        let handler = JwtHandler::new(SECRET).unwrap();

        for token in ["", "invalid", "invalid.token", "a.b.c.d", "invalid.token.here"] {
            assert!(
                matches!(handler.validate(token), Err(TokenError::Malformed(_))),
                "{:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_validate_header_without_alg() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let token = forge(
            json!({ "typ": "JWT" }),
            serde_json::to_value(user_claims(Duration::days(7))).unwrap(),
        );

        assert!(matches!(
            handler.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_signed_payload_without_exp() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let token = forge(
            json!({ "alg": "HS256", "typ": "JWT" }),
            json!({ "sub": Uuid::new_v4().to_string() }),
        );

        assert!(matches!(
            handler.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_bad_subject() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let exp = Utc::now().timestamp() + 3600;

        let not_a_uuid = forge(
            json!({ "alg": "HS256", "typ": "JWT" }),
            json!({ "sub": "user123", "exp": exp }),
        );
        assert!(matches!(
            handler.validate(&not_a_uuid),
            Err(TokenError::BadSubject(_))
        ));

        let missing = forge(
            json!({ "alg": "HS256", "typ": "JWT" }),
            json!({ "exp": exp }),
        );
        assert!(matches!(
            handler.validate(&missing),
            Err(TokenError::BadSubject(_))
        ));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let token = handler.encode(&user_claims(Duration::days(7))).unwrap();

        let forged_payload = b64(&serde_json::to_value(user_claims(Duration::days(365))).unwrap());
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(handler.validate(&tampered), Err(TokenError::BadSignature));
    }
}
