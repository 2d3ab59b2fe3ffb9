//! Bearer token verification shared by every authenticated route.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::parsing::get_header_value;
use crate::errors::ExamError;

/// Decoded claims of a verified token. Lives for one invocation only.
pub type Claims = Map<String, Value>;

/// HS256 verifier holding the shared secret.
///
/// Any validly signed, unexpired token grants access; there are no scopes.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` and `nbf` are checked when present but neither is required.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies a raw token and returns its claims. No clock skew is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the signature is invalid, the token expired
    /// or its `nbf` lies in the future.
    pub fn verify(&self, token: &str) -> Result<Claims, ExamError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                error!("Token verification failed: {}", e);
                ExamError::from(e)
            })?;
        Ok(data.claims)
    }

    /// Looks up the `Authorization` header, normalizes it and verifies the token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the header is absent or malformed, or the
    /// token does not verify.
    pub fn authenticate(&self, headers: &Value) -> Result<Claims, ExamError> {
        self.authenticate_header(get_header_value(headers, "Authorization"))
    }

    /// Normalizes an already looked-up `Authorization` value and verifies it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the value is absent or malformed, or the
    /// token does not verify.
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<Claims, ExamError> {
        let token = extract_token(header)?;
        let claims = self.verify(token)?;
        if let Some(sub) = claims.get("sub").and_then(Value::as_str) {
            debug!(sub = %sub, "Request authenticated");
        }
        Ok(claims)
    }

    /// Signs `claims` with the shared secret.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the claims cannot be encoded.
    pub fn issue(&self, claims: &Claims) -> Result<String, ExamError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }
}

/// Normalizes an `Authorization` header value into a raw token.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively) or a bare
/// token. Any other scheme or an empty value is rejected.
///
/// # Errors
///
/// Returns `Unauthorized` describing why the header was rejected.
pub fn extract_token(header: Option<&str>) -> Result<&str, ExamError> {
    let Some(value) = header else {
        return Err(ExamError::Unauthorized(
            "Missing Authorization header".to_string(),
        ));
    };

    let mut parts = value.split_whitespace();
    let Some(first) = parts.next() else {
        return Err(ExamError::Unauthorized(
            "Empty Authorization header".to_string(),
        ));
    };

    match (parts.next(), parts.next()) {
        (None, _) if first.eq_ignore_ascii_case("bearer") => Err(ExamError::Unauthorized(
            "Missing bearer token".to_string(),
        )),
        (None, _) => Ok(first),
        (Some(token), None) if first.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ExamError::Unauthorized(
            "Malformed Authorization header".to_string(),
        )),
    }
}
