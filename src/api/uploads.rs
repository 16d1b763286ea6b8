use actix_web::{web, HttpRequest, HttpResponse};
use crate::middleware::auth::Claims;
use crate::services::upload_service;

/// POST /api/upload - multipart attachment upload. The whole body is
/// collected first (capped by PayloadConfig at 16 MiB) and then walked
/// with multer looking for the `file` field.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Uploads",
    request_body(content = Vec<u8>, description = "Multipart form-data with a `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored, URL returned"),
        (status = 400, description = "No file part or disallowed type"),
        (status = 500, description = "Write failure"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    user: web::ReqData<Claims>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    log::info!("📎 POST /api/upload - user: {}", user.email);

    let boundary = req
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok());

    let boundary = match boundary {
        Some(boundary) => boundary,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Expected multipart form data"
            }));
        }
    };

    let (name, data) = match read_file_field(body, boundary).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "No file part"
            }));
        }
        Err(e) => {
            log::warn!("❌ Upload rejected: {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({ "message": e }));
        }
    };

    match upload_service::store(&upload_service::upload_dir(), &name, &data).await {
        Ok(stored) => HttpResponse::Ok().json(serde_json::json!({
            "message": "File uploaded successfully",
            "url": stored.url,
            "name": stored.name
        })),
        Err(e) => e.to_response(),
    }
}

/// Pulls the first `file` field out of the multipart body.
async fn read_file_field(
    body: web::Bytes,
    boundary: String,
) -> Result<Option<(String, Vec<u8>)>, String> {
    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {}", e))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("").to_string();
            if name.is_empty() {
                return Err("No selected file".to_string());
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| format!("Field read error: {}", e))?;

            return Ok(Some((name, data.to_vec())));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multipart_body(field_name: &str, filename: &str, content: &str) -> (String, web::Bytes) {
        let boundary = "test-boundary".to_string();
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = field_name,
            n = filename,
            c = content,
        );
        (boundary, web::Bytes::from(body))
    }

    #[tokio::test]
    async fn test_reads_file_field() {
        let (boundary, body) = multipart_body("file", "invoice.pdf", "pdf bytes");
        let (name, data) = read_file_field(body, boundary).await.unwrap().unwrap();
        assert_eq!(name, "invoice.pdf");
        assert_eq!(data, b"pdf bytes");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_none() {
        let (boundary, body) = multipart_body("avatar", "photo.png", "png bytes");
        assert!(read_file_field(body, boundary).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_filename_is_rejected() {
        let (boundary, body) = multipart_body("file", "", "bytes");
        let err = read_file_field(body, boundary).await.unwrap_err();
        assert_eq!(err, "No selected file");
    }
}
