use actix_web::{Error, HttpMessage, HttpRequest, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::user::service::UserService;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
}

/// Identity of the caller, stored in request extensions by [`verify_token`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: ObjectId,
}

/// Issues and checks HS256 tokens signed with the configured secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: chrono::Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry: chrono::Duration) -> Self {
        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn create_token(&self, user_id: &ObjectId) -> Result<String, CustomError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.expiry)
            .ok_or_else(|| CustomError::InternalServerError("Token generation failed".into()))?
            .timestamp() as usize;

        let claims = Claims {
            id: user_id.to_hex(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CustomError::internal("Token generation failed", e))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, CustomError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| CustomError::UnauthorizedError("Token is not valid".into()))
    }
}

/// Bearer-token check for protected routes: the token must decode and its user must
/// still exist.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    match authenticate(&req, credentials.token()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Err(err) => Err((err.into(), req)),
    }
}

async fn authenticate(req: &ServiceRequest, token: &str) -> Result<AuthenticatedUser, CustomError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .cloned()
        .ok_or_else(|| CustomError::InternalServerError("Token service not configured".into()))?;
    let users = req
        .app_data::<web::Data<UserService>>()
        .cloned()
        .ok_or_else(|| CustomError::InternalServerError("User service not configured".into()))?;

    let claims = tokens.decode(token)?;
    let id = ObjectId::parse_str(&claims.id)
        .map_err(|_| CustomError::UnauthorizedError("Token is not valid".into()))?;

    if users.find_user(&id).await?.is_none() {
        return Err(CustomError::UnauthorizedError("Token is not valid".into()));
    }

    Ok(AuthenticatedUser { id })
}

/// Get user ID from request extensions (use after auth middleware)
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<ObjectId, CustomError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.id)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_carries_user_id() {
        let tokens = TokenService::new("test-secret", chrono::Duration::hours(1));
        let id = ObjectId::new();
        let token = tokens.create_token(&id).unwrap();
        assert_eq!(tokens.decode(&token).unwrap().id, id.to_hex());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new("one", chrono::Duration::hours(1));
        let verifier = TokenService::new("two", chrono::Duration::hours(1));
        let token = issuer.create_token(&ObjectId::new()).unwrap();
        assert!(matches!(
            verifier.decode(&token),
            Err(CustomError::UnauthorizedError(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("secret", chrono::Duration::hours(-2));
        let token = tokens.create_token(&ObjectId::new()).unwrap();
        assert!(tokens.decode(&token).is_err());
    }
}
