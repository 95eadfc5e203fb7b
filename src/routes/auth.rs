use crate::{
    auth::{hash_password, verify_password, AuthStore, AuthenticatedUserId, LoginRequest,
        RegisterRequest, SessionResponse},
    error::AppError,
};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account, opens a session for it, and returns the
/// session token. A duplicate email results in a 409 Conflict, raised by
/// the unique constraint rather than a racy pre-check.
#[post("/register")]
pub async fn register(
    store: web::Data<AuthStore>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;
    let register_data = register_data.into_inner();

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Display name falls back to the email address
    let name = match register_data.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => register_data.email.clone(),
    };

    let user = store
        .create_user(&register_data.email, Some(&password_hash), &name)
        .await?;
    let session = store.create_session(user.id).await?;

    Ok(HttpResponse::Created().json(SessionResponse {
        token: session.token,
        user,
    }))
}

/// Login user
///
/// Authenticates a user and returns a session token. Unknown email, wrong
/// password, and password-less (federated-only) accounts all fail with the
/// same "invalid credentials" response.
#[post("/login")]
pub async fn login(
    store: web::Data<AuthStore>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = match store.user_by_email(&login_data.email).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            return Err(AppError::Unauthenticated("invalid credentials".into()))
        }
        Err(e) => return Err(e),
    };

    let password_ok = match user.password_hash.as_deref() {
        Some(hash) => verify_password(&login_data.password, hash)?,
        // Account has no local password (created through a federated provider)
        None => false,
    };
    if !password_ok {
        return Err(AppError::Unauthenticated("invalid credentials".into()));
    }

    let session = store.create_session(user.id).await?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        token: session.token,
        user,
    }))
}

/// Logout
///
/// Deletes the session presented in the Authorization header. The request
/// only reaches this handler if the middleware accepted the session.
#[post("/logout")]
pub async fn logout(
    store: web::Data<AuthStore>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        store.delete_session(token).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Returns the authenticated user's own record.
#[get("/me")]
pub async fn me(
    store: web::Data<AuthStore>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = store.user_by_id(user_id.0).await?;
    Ok(HttpResponse::Ok().json(user))
}
