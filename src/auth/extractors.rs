use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Extracts the authenticated user's ID from request extensions.
///
/// This extractor is intended to be used on routes protected by `AuthMiddleware`,
/// which is responsible for resolving the session token and inserting the user's
/// ID into request extensions.
///
/// If the user ID is not found in the extensions (e.g., if `AuthMiddleware` did not run
/// or failed to insert it), this extractor will return an `AppError::Unauthenticated` error.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub Uuid);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Uuid>().cloned() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => {
                // This case should ideally not be reached if AuthMiddleware is correctly applied
                // and has successfully inserted the user_id. Responding with Unauthenticated
                // is a safe default.
                let err = AppError::Unauthenticated(
                    "User ID not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into())) // Convert AppError to ActixError
            }
        }
    }
}
