use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use super::domain::{Identity, Role};
use super::errors::AccessError;

/// Claims carried by credentials issued by the login service.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    role_scope: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Verifies HS256 bearer credentials against a shared secret.
///
/// Stateless apart from the decoding key; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Decode and verify `token`, returning the caller identity.
    pub fn verify(&self, token: &str) -> Result<Identity, AccessError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            AccessError::Unauthorized(e.to_string())
        })?;
        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(AccessError::Unauthorized("empty subject".into()));
        }
        if claims.role_scope.trim().is_empty() {
            return Err(AccessError::Unauthorized("empty role_scope".into()));
        }
        Ok(Identity {
            role: Role::from_claim(&claims.role_scope),
            subject: claims.sub,
            raw_role: claims.role_scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn mint(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn in_an_hour() -> i64 { chrono::Utc::now().timestamp() + 3600 }

    #[test]
    fn accepts_valid_token() {
        let token = mint(json!({"sub": "u-1", "role_scope": "agency_admin", "exp": in_an_hour()}), SECRET);
        let id = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(id.subject, "u-1");
        assert_eq!(id.role, Some(Role::AgencyAdmin));
        assert_eq!(id.raw_role, "agency_admin");
    }

    #[test]
    fn unknown_role_is_kept_as_none() {
        let token = mint(json!({"sub": "u-1", "role_scope": "JANITOR", "exp": in_an_hour()}), SECRET);
        let id = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(id.role, None);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = mint(json!({"sub": "u-1", "role_scope": "SUPER_ADMIN", "exp": in_an_hour()}), "other");
        assert!(matches!(TokenVerifier::new(SECRET).verify(&token), Err(AccessError::Unauthorized(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = mint(json!({"sub": "u-1", "role_scope": "SUPER_ADMIN", "exp": exp}), SECRET);
        assert!(matches!(TokenVerifier::new(SECRET).verify(&token), Err(AccessError::Unauthorized(_))));
    }

    #[test]
    fn rejects_missing_claims() {
        let v = TokenVerifier::new(SECRET);
        let no_role = mint(json!({"sub": "u-1", "exp": in_an_hour()}), SECRET);
        assert!(v.verify(&no_role).is_err());
        let no_sub = mint(json!({"role_scope": "SUPER_ADMIN", "exp": in_an_hour()}), SECRET);
        assert!(v.verify(&no_sub).is_err());
        let no_exp = mint(json!({"sub": "u-1", "role_scope": "SUPER_ADMIN"}), SECRET);
        assert!(v.verify(&no_exp).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(TokenVerifier::new(SECRET).verify("not-a-jwt").is_err());
        assert!(TokenVerifier::new(SECRET).verify("").is_err());
    }
}
