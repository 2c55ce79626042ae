/// JSON error responses for the HTTP side of the server.
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

/// Returns an HTTP error response with a JSON body:
/// `{"error":{"code":...,"message":...,"context":...}}`.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_ROOM_CODE").
/// - `message`: Human-readable error message.
/// - `context`: Optional context, such as the offending room code.
/// - `status`: HTTP status code.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(""),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix::test]
    async fn test_error_body_is_escaped_json() {
        let resp = http_error_response("INVALID_ROOM_CODE", "bad", Some(r#"a"b"#), StatusCode::BAD_REQUEST);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["context"], r#"a"b"#);
        assert_eq!(body["error"]["code"], "INVALID_ROOM_CODE");
    }
}
