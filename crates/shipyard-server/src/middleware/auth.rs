// Authentication middleware for Actix-web
// Requires `Authorization: Token <secret>` on every non-exempt request

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
};
use futures::future::LocalBoxFuture;
use shipyard_common::ShipyardError;

use crate::error::AppError;
use crate::model::{AUTHORIZATION_HEADER, AppState, HEALTH_PATH_PREFIX, TOKEN_SCHEME};

// Token authentication middleware transformer
pub struct TokenAuthentication;

impl<S, B> Transform<S, ServiceRequest> for TokenAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(TokenAuthenticationMiddleware { service })
    }
}

pub struct TokenAuthenticationMiddleware<S> {
    service: S,
}

/// Extract the credential from an `Authorization: Token <credential>` header.
///
/// The scheme is matched case-insensitively; the credential is returned verbatim.
fn extract_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION_HEADER)?.to_str().ok()?;
    let (scheme, credential) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

fn is_exempt(req: &ServiceRequest) -> bool {
    if Method::OPTIONS == *req.method() {
        return true;
    }
    req.path()
        .strip_prefix(HEALTH_PATH_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn authenticate(req: &ServiceRequest) -> Result<(), ShipyardError> {
    let Some(app_state) = req.app_data::<Data<AppState>>() else {
        tracing::error!("AppState not found in request app_data");
        return Err(ShipyardError::Authentication(
            "authentication is not configured".to_string(),
        ));
    };

    match extract_token(req) {
        Some(token) if token == app_state.token_secret => Ok(()),
        Some(_) => Err(ShipyardError::Authentication("invalid token".to_string())),
        None => Err(ShipyardError::Authentication("missing token".to_string())),
    }
}

impl<S, B> Service<ServiceRequest> for TokenAuthenticationMiddleware<S>
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
        if !is_exempt(&req)
            && let Err(err) = authenticate(&req)
        {
            tracing::warn!(
                method = %req.method(),
                path = req.path(),
                reason = %err,
                "Rejected unauthenticated request"
            );
            let response = AppError::from(err).error_response();
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let res = self.service.call(req);

        Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
    }
}
