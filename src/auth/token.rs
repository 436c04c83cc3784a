use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};
use crate::models::Principal;

/// Every token is signed and verified with this algorithm, nothing else is accepted.
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// Minimum decoded secret length (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Represents the claims encoded within a JWT (JSON Web Token).
///
/// Roles are intentionally absent: they are re-read from the credential store on
/// every request so that role changes apply immediately.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token, the username.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HS512-signed, time-bounded identity tokens.
///
/// One instance is built at startup from the process-wide secret and shared by
/// reference; it holds no mutable state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Builds the service from a base64-encoded secret and a lifetime in milliseconds.
    ///
    /// Fails if the secret does not decode, is shorter than [`MIN_SECRET_BYTES`],
    /// or the lifetime is not positive. Callers treat this as fatal at startup.
    pub fn new(secret_base64: &str, ttl_ms: i64) -> Result<Self, AppError> {
        let secret = STANDARD.decode(secret_base64.trim()).map_err(|e| {
            AppError::Configuration(format!("JWT_SECRET is not valid base64: {}", e))
        })?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::Configuration(format!(
                "JWT_SECRET must decode to at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            )));
        }
        if ttl_ms <= 0 {
            return Err(AppError::Configuration(
                "JWT_EXPIRATION_MS must be positive".into(),
            ));
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
            ttl: Duration::milliseconds(ttl_ms),
        })
    }

    /// Issues a token for `principal`, valid from now for the configured lifetime.
    pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: principal.username.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// The header is checked first so that garbage input is reported as
    /// malformed and a foreign algorithm as unsupported. The signature is checked
    /// before expiry: a token signed with another key is malformed even if it
    /// has also expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let header = decode_header(token).map_err(|_| classify_header(token))?;
        if header.alg != ALGORITHM {
            return Err(AuthError::UnsupportedToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(e.kind()))?;

        // `exp` must be strictly in the future.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::UnsupportedToken);
        }

        Ok(claims)
    }

    /// Returns the username carried by a valid token.
    pub fn subject_of(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token).map(|claims| claims.sub)
    }

    /// Boolean form of [`TokenService::verify`]; the failure kind is logged.
    pub fn is_valid(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }
}

/// A header that jsonwebtoken cannot parse is still unsupported rather than
/// malformed when it is a JSON object naming an algorithm (`"alg": "none"`,
/// or one the crate does not know).
fn classify_header(token: &str) -> AuthError {
    let names_algorithm = token
        .split('.')
        .next()
        .and_then(|segment| URL_SAFE_NO_PAD.decode(segment).ok())
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .map_or(false, |header| {
            header.get("alg").map_or(false, serde_json::Value::is_string)
        });

    if names_algorithm {
        AuthError::UnsupportedToken
    } else {
        AuthError::MalformedToken
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature
        | ErrorKind::Json(_) => AuthError::UnsupportedToken,
        _ => AuthError::MalformedToken,
    }
}
