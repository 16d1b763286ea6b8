mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Supplier Service...");

    // Build the in-memory credential store from the environment
    let credentials = services::auth_service::CredentialStore::from_env()
        .expect("Failed to build credential store");
    let credentials_data = web::Data::new(credentials);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");
    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // Make sure the attachment directory exists before serving from it
    let upload_dir = services::upload_service::upload_dir();
    std::fs::create_dir_all(&upload_dir)?;
    log::info!("📁 Upload directory: {}", upload_dir.display());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(credentials_data.clone())
            // Upload bodies are collected whole; cap them at 16 MiB
            .app_data(web::PayloadConfig::new(
                services::upload_service::MAX_UPLOAD_BYTES,
            ))
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints (login is the only unauthenticated API route)
            .service(
                web::scope("/api/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/verify", web::get().to(api::auth::verify_token)),
            )
            // Suppliers CRUD + export - requires JWT
            // NOTE: export must be registered before /{id}
            .service(
                web::scope("/api/suppliers")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::suppliers::export_suppliers)
                    .service(api::suppliers::get_suppliers)
                    .service(api::suppliers::create_supplier)
                    .service(api::suppliers::get_supplier)
                    .service(api::suppliers::update_supplier)
                    .service(api::suppliers::delete_supplier),
            )
            // Attachment upload - requires JWT
            .service(
                web::resource("/api/upload")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::post().to(api::uploads::upload_file)),
            )
            // Uploaded files are served straight from disk
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
            // Static client UI
            .service(actix_files::Files::new("/", "./static").index_file("index.html"))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
