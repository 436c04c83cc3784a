use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use super::interceptor::RequestInterceptor;
use super::policy::AccessPolicy;
use super::responder::Unauthorized;

/// Authentication and access control for every request, ahead of routing.
///
/// For each request the interceptor builds a [`SecurityContext`](super::SecurityContext)
/// from the bearer token, the context is stored in the request extensions, and the
/// access policy decides whether the request reaches the router. Denied requests
/// are answered with the uniform 401 body and never reach a handler.
#[derive(Clone)]
pub struct AuthMiddleware {
    interceptor: Arc<RequestInterceptor>,
    policy: Arc<AccessPolicy>,
}

impl AuthMiddleware {
    pub fn new(interceptor: Arc<RequestInterceptor>, policy: Arc<AccessPolicy>) -> Self {
        Self {
            interceptor,
            policy,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            interceptor: Arc::clone(&self.interceptor),
            policy: Arc::clone(&self.policy),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    interceptor: Arc<RequestInterceptor>,
    policy: Arc<AccessPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let interceptor = Arc::clone(&self.interceptor);
        let policy = Arc::clone(&self.policy);

        Box::pin(async move {
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let context = interceptor.intercept(authorization.as_deref()).await;
            // The router matches the percent-decoded path, so the policy must too.
            let path = req.match_info().as_str().to_owned();
            let decision = policy.authorize(&path, &context);
            req.extensions_mut().insert(context);

            match decision {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(reason) => {
                    let response = Unauthorized::new(path, reason).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
