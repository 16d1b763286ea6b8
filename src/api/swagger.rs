use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Supplier Service API",
        version = "1.0.0",
        description = "Back-office API for supplier vendor records.\n\n**Authentication:** All supplier and upload endpoints require a JWT Bearer token obtained from /api/auth/login.\n\n**Features:**\n- Paginated supplier listing with company-name search\n- Supplier create/view/update/delete\n- Attachment upload with retrievable URLs\n- CSV export of all suppliers"
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::verify_token,

        // Health
        crate::api::health::health_check,

        // Suppliers
        crate::api::suppliers::get_suppliers,
        crate::api::suppliers::export_suppliers,
        crate::api::suppliers::get_supplier,
        crate::api::suppliers::create_supplier,
        crate::api::suppliers::update_supplier,
        crate::api::suppliers::delete_supplier,

        // Uploads
        crate::api::uploads::upload_file,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::models::UserInfo,

            // Suppliers
            crate::models::SupplierResponse,
            crate::models::CreateSupplierRequest,
            crate::models::UpdateSupplierRequest,
            crate::models::Attachment,
            crate::models::SupplierStatus,
            crate::services::supplier_service::SupplierPage,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Login and token verification."),
        (name = "Suppliers", description = "Supplier record CRUD, search, pagination and CSV export."),
        (name = "Uploads", description = "Attachment upload; files are served back under /uploads."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
