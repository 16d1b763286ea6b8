use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    Internal(String),
    NotFound(String),
    InvalidRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error onto the `{message}` JSON body every failing route
    /// returns. Database errors are logged server-side and surfaced as a
    /// generic message with no detail leaked to the client.
    pub fn to_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AppError::DatabaseError(msg) | AppError::Internal(msg) => {
                log::error!("💥 Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal server error"
                }))
            }
            AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "message": msg
            })),
            AppError::InvalidRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "message": msg
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AppError::NotFound("Supplier not found".into()).to_string(),
            "Supplier not found"
        );
        assert_eq!(
            AppError::DatabaseError("boom".into()).to_string(),
            "Database error: boom"
        );
    }
}
