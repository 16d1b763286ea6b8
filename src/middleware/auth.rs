use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;

pub use crate::services::auth_service::Claims;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::to_owned);

        let token = match token {
            Some(token) => token,
            None => {
                return Box::pin(async move { Ok(unauthorized(req, "Token is missing")) });
            }
        };

        // Expired, malformed and forged tokens are deliberately
        // indistinguishable to the caller; the cause only goes to the log.
        match auth_service::verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("🔒 Rejected token: {}", e);
                Box::pin(async move { Ok(unauthorized(req, "Token is invalid")) })
            }
        }
    }
}

/// Short-circuits with the `{message}` JSON body the API contract promises.
fn unauthorized<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let response = HttpResponse::Unauthorized()
        .json(serde_json::json!({ "message": message }))
        .map_into_right_body();

    req.into_response(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::services::auth_service::issue_token_with_secret;
    use actix_web::{test, web, App};
    use chrono::{Duration, Utc};

    const TEST_SECRET: &str = "middleware-test-secret";

    async fn whoami(user: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "sub": user.sub }))
    }

    fn test_token(expires_at: chrono::DateTime<Utc>) -> String {
        let user = User {
            id: "1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            name: "Admin".to_string(),
        };
        issue_token_with_secret(&user, TEST_SECRET, expires_at).unwrap()
    }

    #[actix_web::test]
    async fn test_missing_token_is_401() {
        std::env::set_var("JWT_SECRET", TEST_SECRET);
        let app = test::init_service(App::new().service(
            web::resource("/protected").wrap(AuthMiddleware).route(web::get().to(whoami)),
        ))
        .await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token is missing");
    }

    #[actix_web::test]
    async fn test_garbage_token_is_401() {
        std::env::set_var("JWT_SECRET", TEST_SECRET);
        let app = test::init_service(App::new().service(
            web::resource("/protected").wrap(AuthMiddleware).route(web::get().to(whoami)),
        ))
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token is invalid");
    }

    #[actix_web::test]
    async fn test_expired_token_is_401() {
        std::env::set_var("JWT_SECRET", TEST_SECRET);
        let app = test::init_service(App::new().service(
            web::resource("/protected").wrap(AuthMiddleware).route(web::get().to(whoami)),
        ))
        .await;

        let token = test_token(Utc::now() - Duration::hours(25));
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        std::env::set_var("JWT_SECRET", TEST_SECRET);
        let app = test::init_service(App::new().service(
            web::resource("/protected").wrap(AuthMiddleware).route(web::get().to(whoami)),
        ))
        .await;

        let token = test_token(Utc::now() + Duration::hours(24));
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["sub"], "1");
    }
}
