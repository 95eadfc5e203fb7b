use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::store::AuthStore;
use crate::error::AppError;

/// Resolves the bearer token on every request under `/api` to a user
/// identity before the handler runs. The session lookup hits the database
/// on each request; nothing about identity is cached across requests.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // The service is shared into an async block below, hence the Rc.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Skip authentication for health check and the public auth endpoints
            let path = req.path();
            if path == "/health"
                || path.starts_with("/api/auth/login")
                || path.starts_with("/api/auth/register")
            {
                return service.call(req).await;
            }

            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned);

            let token = match token {
                Some(token) => token,
                None => return Err(AppError::Unauthenticated("missing token".into()).into()),
            };

            let store = match req.app_data::<web::Data<AuthStore>>() {
                Some(store) => store.clone(),
                None => {
                    return Err(AppError::Internal("auth store not configured".into()).into())
                }
            };

            let user = store.authenticate(&token).await?;
            req.extensions_mut().insert(user.id);
            service.call(req).await
        })
    }
}
