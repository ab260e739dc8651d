use std::future::{Ready, ready};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};

use crate::errors::ApiError;
use crate::state::app_state::AppState;

/// Exact byte comparison that takes the same time wherever the tokens differ.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is
/// configured. Without one the wrapped routes stay open.
pub struct AdminGuard;

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AdminGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardMiddleware { service }))
    }
}

pub struct AdminGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let expected = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.config.admin_token.clone());

        let expected = match expected {
            Some(token) => token,
            None => return Box::pin(self.service.call(req)),
        };

        // Get token from Authorization header
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| tokens_match(token, &expected));

        match authorized {
            Some(true) => Box::pin(self.service.call(req)),
            Some(false) => {
                log::warn!("Rejected admin request to {} with a bad token", req.path());
                Box::pin(async move {
                    Err(Error::from(ApiError::Unauthorized("Invalid admin token")))
                })
            }
            None => Box::pin(async move {
                Err(Error::from(ApiError::Unauthorized(
                    "Admin authorization required",
                )))
            }),
        }
    }
}
