use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::{AuthKeys, Role};
use crate::utils::AppError;

const MISSING_TOKEN: &str = "Not authorized. Please login again.";
const BAD_TOKEN: &str = "Invalid or expired token. Please login again.";

/// Guards a scope or resource for one role. Verified claims are stored in
/// the request extensions for `web::ReqData<Claims>`.
pub struct RoleAuth {
    role: Role,
}

impl RoleAuth {
    pub fn new(role: Role) -> Self {
        RoleAuth { role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleAuthMiddleware {
            service,
            role: self.role,
        }))
    }
}

pub struct RoleAuthMiddleware<S> {
    service: S,
    role: Role,
}

/// Role header first (`aToken`, `itoken`, `token`), then `Authorization: Bearer`.
fn extract_token(req: &ServiceRequest, role: Role) -> Option<String> {
    let from_role_header = req
        .headers()
        .get(role.header_name())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let from_bearer = || {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    };

    from_role_header.or_else(from_bearer).map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for RoleAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = match (extract_token(&req, self.role), req.app_data::<web::Data<AuthKeys>>()) {
            (_, None) => Err(AppError::internal("AuthKeys not registered as app data")),
            (None, Some(_)) => Err(AppError::unauthorized(MISSING_TOKEN)),
            (Some(token), Some(keys)) => keys.verify(&token, self.role).map_err(|e| {
                log::warn!("⚠️ Rejected {} token on {}: {}", self.role, req.path(), e);
                AppError::unauthorized(BAD_TOKEN)
            }),
        };

        match verdict {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                let response = err.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
