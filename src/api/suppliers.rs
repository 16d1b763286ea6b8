use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{CreateSupplierRequest, UpdateSupplierRequest};
use crate::services::supplier_service;

/// Pagination and search query
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct SupplierListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// GET /api/suppliers - paginated listing with company-name search
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    params(SupplierListQuery),
    responses(
        (status = 200, description = "Page of suppliers", body = supplier_service::SupplierPage),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[get("")]
pub async fn get_suppliers(
    query: web::Query<SupplierListQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match supplier_service::list(&db, query.search.as_deref(), query.page, query.limit).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => e.to_response(),
    }
}

/// GET /api/suppliers/export - every record as a CSV attachment.
/// Registered before /{id} so "export" is not taken for an id.
#[utoipa::path(
    get,
    path = "/api/suppliers/export",
    tag = "Suppliers",
    responses(
        (status = 200, description = "CSV of all suppliers", body = String, content_type = "text/csv"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[get("/export")]
pub async fn export_suppliers(db: web::Data<MongoDB>) -> impl Responder {
    log::info!("📤 GET /api/suppliers/export");

    match supplier_service::export_all(&db).await {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header(("Content-Disposition", "attachment; filename=suppliers.csv"))
            .body(csv),
        Err(e) => e.to_response(),
    }
}

/// GET /api/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier ObjectId (hex)")),
    responses(
        (status = 200, description = "The supplier"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Supplier not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[get("/{id}")]
pub async fn get_supplier(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    let supplier_id = path.into_inner();

    match supplier_service::get(&db, &supplier_id).await {
        Ok(supplier) => HttpResponse::Ok().json(serde_json::json!({ "supplier": supplier })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/suppliers - create from the add form
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 200, description = "Supplier created"),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create_supplier(
    user: web::ReqData<Claims>,
    body: web::Json<CreateSupplierRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match supplier_service::insert(&db, &body).await {
        Ok(supplier_id) => {
            log::info!("✅ Supplier {} created by {}", supplier_id, user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Supplier added successfully",
                "supplierId": supplier_id
            }))
        }
        Err(e) => e.to_response(),
    }
}

/// PUT /api/suppliers/{id} - shallow-merge the provided fields
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier ObjectId (hex)")),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier updated"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Supplier not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[put("/{id}")]
pub async fn update_supplier(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<UpdateSupplierRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let supplier_id = path.into_inner();

    match supplier_service::update(&db, &supplier_id, &body).await {
        Ok(()) => {
            log::info!("✅ Supplier {} updated by {}", supplier_id, user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Supplier updated successfully",
                "supplierId": supplier_id
            }))
        }
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier ObjectId (hex)")),
    responses(
        (status = 200, description = "Supplier deleted"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Supplier not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[delete("/{id}")]
pub async fn delete_supplier(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let supplier_id = path.into_inner();

    match supplier_service::delete(&db, &supplier_id).await {
        Ok(()) => {
            log::info!("🗑️ Supplier {} deleted by {}", supplier_id, user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Supplier deleted successfully",
                "supplierId": supplier_id
            }))
        }
        Err(e) => e.to_response(),
    }
}
