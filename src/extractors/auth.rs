use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use secrecy::Secret;
use uuid::Uuid;

use crate::auth::{decode_token, extract_token};
use crate::errors::AppError;

/// Extractor that validates the bearer token and provides the
/// authenticated user's ID to handlers.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let jwt_secret = match req.app_data::<web::Data<Secret<String>>>() {
            Some(secret) => secret.get_ref().clone(),
            None => {
                return err(AppError::InternalError(
                    "JWT secret not configured".to_string(),
                ))
            }
        };

        let token = match extract_token(req) {
            Ok(t) => t,
            Err(e) => return err(e),
        };

        match decode_token(&token, &jwt_secret) {
            Ok(claims) => ok(AuthenticatedUser {
                user_id: claims.sub,
            }),
            Err(e) => err(e),
        }
    }
}
