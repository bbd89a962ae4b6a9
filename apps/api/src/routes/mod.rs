pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// GET /
/// Upload page for both flows.
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health::health_handler))
        .route("/process", post(resume::handle_process))
        .route("/match_resumes", post(matching::handle_match_resumes))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::llm_client::{CompletionRequest, LlmError, TextOracle};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "resumatch-test-boundary";

    struct CannedOracle(&'static str);

    #[async_trait]
    impl TextOracle for CannedOracle {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Counts the files in the upload directory each time it is asked.
    struct DirWatchingOracle {
        dir: PathBuf,
        files_seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl TextOracle for DirWatchingOracle {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, LlmError> {
            let count = std::fs::read_dir(&self.dir).unwrap().count();
            self.files_seen.lock().unwrap().push(count);
            Ok(r#"{"soft_skills": ["Mentoring"]}"#.to_string())
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            upload_dir: dir.path().to_path_buf(),
            match_upload_dir: dir.path().to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            llm_timeout_secs: 5,
        }
    }

    /// Router plus the temp dir backing both upload directories.
    fn app(answer: &'static str) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            config: test_config(&dir),
            oracle: Arc::new(CannedOracle(answer)),
        };
        (build_router(state), dir)
    }

    async fn post_form(app: Router, uri: &str, parts: Vec<Part<'_>>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn dir_is_empty(dir: &TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let (app, _dir) = app("{}");

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["service"], "resumatch");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_process_without_file_is_bad_request() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(app, "/process", vec![Part::Text("note", "hi")]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file uploaded.");
    }

    #[tokio::test]
    async fn test_process_with_empty_filename_is_bad_request() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(app, "/process", vec![Part::File("pdf_doc", "", Vec::new())]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file selected.");
    }

    #[tokio::test]
    async fn test_process_returns_structured_resume_and_cleans_up() {
        let (app, dir) = app(r#"```json
{"personal_info": {"full_name": "Ada Lovelace"}, "soft_skills": ["Analysis",],}
```"#);
        let pdf = pdf_with_pages(&["Ada Lovelace", "Analytical Engine programmer"]);
        let (status, json) = post_form(app, "/process", vec![Part::File("pdf_doc", "ada.pdf", pdf)]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["personal_info"]["full_name"], "Ada Lovelace");
        assert_eq!(json["soft_skills"][0], "Analysis");
        assert!(json.get("error").is_none());
        assert!(dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_process_with_unparsable_answer_is_degraded() {
        let (app, _dir) = app("I cannot help with that.");
        let pdf = pdf_with_pages(&["Ada Lovelace"]);
        let (status, json) = post_form(app, "/process", vec![Part::File("pdf_doc", "ada.pdf", pdf)]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], "Failed to parse resume");
        assert_eq!(json["raw_output"], "I cannot help with that.");
    }

    #[tokio::test]
    async fn test_process_with_corrupt_pdf_is_server_error() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(
            app,
            "/process",
            vec![Part::File("pdf_doc", "cv.pdf", b"definitely not a pdf".to_vec())],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error processing file: "));
    }

    #[tokio::test]
    async fn test_match_requires_job_description() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(
            app,
            "/match_resumes",
            vec![
                Part::Text("job_description", "  "),
                Part::File("resumes", "a.txt", b"python".to_vec()),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Job description is required.");
    }

    #[tokio::test]
    async fn test_match_requires_a_selected_resume() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(
            app,
            "/match_resumes",
            vec![
                Part::Text("job_description", "python developer"),
                Part::File("resumes", "", Vec::new()),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please upload at least one resume.");
    }

    #[tokio::test]
    async fn test_match_with_only_unreadable_files_is_unprocessable() {
        let (app, _dir) = app("{}");
        let (status, json) = post_form(
            app,
            "/match_resumes",
            vec![
                Part::Text("job_description", "python developer"),
                Part::File("resumes", "photo.png", b"\x89PNG".to_vec()),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "No extractable text found in the uploaded resumes.");
    }

    #[tokio::test]
    async fn test_match_ranks_uploads() {
        let (app, dir) = app(r#"{"technical_skills": {"languages": ["Python"]}}"#);
        let (status, json) = post_form(
            app,
            "/match_resumes",
            vec![
                Part::Text("job_description", "Python developer"),
                Part::File("resumes", "chef.txt", b"I cook pasta".to_vec()),
                Part::File("resumes", "dev.txt", b"Senior python developer".to_vec()),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["filename"], "dev.txt");
        assert_eq!(json["missing_keywords"], serde_json::json!(["developer"]));
        assert!(json["skipped_files"].as_array().unwrap().is_empty());
        assert!(dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_match_removes_uploads_before_structuring() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(DirWatchingOracle {
            dir: dir.path().to_path_buf(),
            files_seen: Mutex::new(Vec::new()),
        });
        let state = AppState {
            config: test_config(&dir),
            oracle: oracle.clone(),
        };

        let (status, _json) = post_form(
            build_router(state),
            "/match_resumes",
            vec![
                Part::Text("job_description", "Python developer"),
                Part::File("resumes", "a.txt", b"python developer".to_vec()),
                Part::File("resumes", "b.txt", b"rust developer".to_vec()),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(*oracle.files_seen.lock().unwrap(), vec![0, 0]);
    }
}
