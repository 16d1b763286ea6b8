pub mod auth_service;
pub mod supplier_service;
pub mod upload_service;
