use crate::models::UserInfo;
use crate::services::auth_service;
use crate::services::auth_service::{CredentialStore, LoginRequest, LoginResponse};
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    credentials: web::Data<CredentialStore>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /api/auth/login - email: {}", request.email);

    match auth_service::login(&credentials, &request) {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Invalid credentials"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = UserInfo),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Token is missing"
            }));
        }
    };

    match auth_service::verify_token(token) {
        Ok(claims) => HttpResponse::Ok().json(serde_json::json!({
            "valid": true,
            "user": UserInfo {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
            }
        })),
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Token is invalid"
            }))
        }
    }
}
