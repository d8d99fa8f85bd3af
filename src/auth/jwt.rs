use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by tokens issued by the external Auth Core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id, as a string per JWT convention.
    pub sub: String,
    pub exp: usize,
}

pub trait BearerAuthenticator: Send + Sync {
    fn verify(&self, token: &str) -> Result<i64, String>;
}

pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(jsonwebtoken::Algorithm::HS256),
        }
    }
}

impl BearerAuthenticator for JwtAuthenticator {
    fn verify(&self, token: &str) -> Result<i64, String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| e.to_string())?;
        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| "subject claim is not a numeric user id".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(user_id: i64, secret: &str, exp: usize) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn verifies_well_formed_token() {
        let secret = "test-secret";
        let auth = JwtAuthenticator::new(secret);
        let future_exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        let token = token_for(42, secret, future_exp);
        assert_eq!(auth.verify(&token).unwrap(), 42);
    }

    #[test]
    fn rejects_token_signed_with_wrong_secret() {
        let auth = JwtAuthenticator::new("real-secret");
        let future_exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        let token = token_for(42, "wrong-secret", future_exp);
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let secret = "test-secret";
        let auth = JwtAuthenticator::new(secret);
        let token = token_for(42, secret, 1);
        assert!(auth.verify(&token).is_err());
    }
}
