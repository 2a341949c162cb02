use chrono::{Duration, Utc};
use folio_api::endpoints::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::common::{Claims, TokenKind};
use crate::server::config::AuthConfiguration;
use crate::server::error::ServerError;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Signs and verifies access and refresh tokens.
///
/// The two kinds use separate secrets and carry their kind in the `typ`
/// claim, so neither can stand in for the other.
pub struct TokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(auth: &AuthConfiguration) -> Self {
        Self::with_secrets(
            &auth.access_secret,
            &auth.refresh_secret,
            Duration::seconds(auth.access_ttl_seconds),
            Duration::seconds(auth.refresh_ttl_seconds),
        )
    }

    pub fn with_secrets(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access: SigningKeys::new(access_secret, access_ttl),
            refresh: SigningKeys::new(refresh_secret, refresh_ttl),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn issue(&self, user_id: UserId, kind: TokenKind) -> Result<String, ServerError> {
        let keys = self.keys(kind);
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + keys.ttl).timestamp(),
            iat: now.timestamp(),
            typ: kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| ServerError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature, expiry and kind
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, ServerError> {
        let claims = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(?kind, "Token rejected: {}", e);
                ServerError::Unauthorized("Invalid or expired token".to_string())
            })?
            .claims;

        if claims.typ != kind {
            tracing::debug!(?kind, actual = ?claims.typ, "Token of the wrong kind");
            return Err(ServerError::Unauthorized(
                "Invalid or expired token".to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::with_secrets("a-secret", "r-secret", Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let user_id = UserId::new_v4();

        let token = issuer.issue(user_id, TokenKind::Access).unwrap();
        let claims = issuer.verify(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let issuer = issuer();
        let user_id = UserId::new_v4();

        let access = issuer.issue(user_id, TokenKind::Access).unwrap();
        let refresh = issuer.issue(user_id, TokenKind::Refresh).unwrap();

        assert!(issuer.verify(&access, TokenKind::Refresh).is_err());
        assert!(issuer.verify(&refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn test_same_secret_still_checks_kind() {
        let issuer =
            TokenIssuer::with_secrets("shared", "shared", Duration::minutes(15), Duration::days(7));
        let refresh = issuer.issue(UserId::new_v4(), TokenKind::Refresh).unwrap();

        assert!(issuer.verify(&refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::with_secrets(
            "a-secret",
            "r-secret",
            Duration::seconds(-60),
            Duration::days(7),
        );
        let token = issuer.issue(UserId::new_v4(), TokenKind::Access).unwrap();

        assert!(matches!(
            issuer.verify(&token, TokenKind::Access),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = TokenIssuer::with_secrets("x", "y", Duration::minutes(15), Duration::days(7));
        let token = other.issue(UserId::new_v4(), TokenKind::Access).unwrap();

        assert!(issuer().verify(&token, TokenKind::Access).is_err());
        assert!(issuer().verify("garbage", TokenKind::Access).is_err());
    }
}
