pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes", get(handlers::handle_list_resumes))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse))
        .route("/api/v1/resumes/upload", post(handlers::handle_upload))
        .route("/api/v1/resumes/:id", get(handlers::handle_get_resume))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::parser::ResumeParser;
    use crate::resumes::InMemoryResumeStore;

    const RESUME_TEXT: &str = "Jane Smith\njane.smith@example.com\n\nEXPERIENCE\nSoftware Engineer\nAcme Corp\n2020 - 2023\n• Built scalable APIs\n• Led a team of 4\n\nEDUCATION\nBachelor of Science\nState University\n2019";

    const BOUNDARY: &str = "resume-api-test-boundary";

    fn test_router() -> Router {
        build_router(AppState {
            store: Arc::new(InMemoryResumeStore::new()),
            parser: Arc::new(ResumeParser::new()),
            config: Config::default(),
        })
    }

    fn multipart_request(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_parse_text_returns_resume_and_report() {
        let response = test_router()
            .oneshot(json_request("/api/v1/resumes/parse", json!({ "text": RESUME_TEXT })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["resume"]["contact"]["name"], "Jane Smith");
        assert_eq!(body["resume"]["experience"][0]["startDate"], "2020");
        assert_eq!(body["resume"]["education"][0]["graduationDate"], "2019");
        assert_eq!(body["report"]["nameSource"], "header");
    }

    #[tokio::test]
    async fn test_parse_short_text_is_rejected() {
        let response = test_router()
            .oneshot(json_request("/api/v1/resumes/parse", json!({ "text": "Jane Smith" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INSUFFICIENT_TEXT");
    }

    #[tokio::test]
    async fn test_parse_uses_filename_when_name_missing() {
        let text = "EXPERIENCE\nData Analyst\nInitech\n2019 - 2021\n- Built weekly revenue dashboards";
        let response = test_router()
            .oneshot(json_request(
                "/api/v1/resumes/parse",
                json!({ "text": text, "filename": "alex_kim_resume.pdf" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resume"]["contact"]["name"], "Alex Kim");
        assert_eq!(body["report"]["nameSource"], "filename");
    }

    #[tokio::test]
    async fn test_upload_then_fetch_and_list() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(multipart_request("file", "jane.txt", "text/plain", RESUME_TEXT.as_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["resume"]["contact"]["email"], "jane.smith@example.com");

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/resumes/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stored = json_body(response).await;
        assert_eq!(stored["candidate_name"], "Jane Smith");
        assert_eq!(stored["source_filename"], "jane.txt");
        assert_eq!(stored["data"]["experience"][0]["company"], "Acme Corp");

        let response = app.oneshot(get_request("/api/v1/resumes?limit=5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = json_body(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let response = test_router()
            .oneshot(multipart_request("attachment", "jane.txt", "text/plain", RESUME_TEXT.as_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_binary() {
        let response = test_router()
            .oneshot(multipart_request("file", "photo.png", "image/png", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let uri = format!("/api/v1/resumes/{}", uuid::Uuid::new_v4());
        let response = test_router().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
