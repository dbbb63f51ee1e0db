use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use plancast_core::config::GeneratorConfig;
use plancast_core::generate::{GenerateError, PlanGenerator};
use plancast_core::layout::{LayoutPayload, SaveLayoutRequest, validate};
use plancast_core::store::{LayoutStore, PhotoStore, StoreError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// HTTP-facing error: status code, machine-readable kind, human message.
pub struct AppError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "bad_request",
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "kind": self.kind, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        let (status, kind) = match &err {
            GenerateError::MissingCredential => (StatusCode::INTERNAL_SERVER_ERROR, "config"),
            GenerateError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            GenerateError::UpstreamUnavailable(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "upstream_unavailable")
            }
            GenerateError::UpstreamStatus { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            GenerateError::MalformedResponse => (StatusCode::BAD_GATEWAY, "malformed_upstream"),
        };
        Self {
            status,
            kind,
            // The Display form keeps the upstream's raw diagnostic text.
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let (status, kind) = match &err {
            StoreError::InvalidId(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::Corrupt(_) | StoreError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage")
            }
        };
        Self {
            status,
            kind,
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// State and router
// ---------------------------------------------------------------------------

pub struct AppState {
    pub layouts: LayoutStore,
    pub photos: PhotoStore,
    pub generator: PlanGenerator,
    uploads_root: PathBuf,
}

impl AppState {
    pub fn new(uploads_root: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        let uploads_root = uploads_root.into();
        Self {
            layouts: LayoutStore::new(&uploads_root),
            photos: PhotoStore::new(&uploads_root),
            generator: PlanGenerator::new(config),
            uploads_root,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(&state.uploads_root);
    Router::new()
        .route("/healthz", get(healthz))
        .route("/upload-photo", post(upload_photo))
        .route("/save-layout", post(save_layout))
        .route("/generate-plan", post(generate_plan))
        .nest_service("/uploads", uploads)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: Arc<AppState>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("plancast listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("plancast shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Multipart photo upload: a `roomId` text field plus a `file` part.
async fn upload_photo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<axum::response::Response, AppError> {
    let mut room_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("roomId") | Some("room_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("unreadable roomId field: {e}")))?;
                room_id = Some(text);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("unreadable file field: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let room_id = room_id.ok_or_else(|| AppError::bad_request("missing roomId field"))?;
    let (file_name, bytes) = file.ok_or_else(|| AppError::bad_request("missing file field"))?;

    let record = state.photos.save(&room_id, &file_name, &bytes)?;
    Ok(Json(record).into_response())
}

/// Persist an arbitrary layout blob, verbatim and unvalidated.
async fn save_layout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveLayoutRequest>,
) -> Result<axum::response::Response, AppError> {
    state.layouts.save(&req.layout_id, &req.payload)?;
    Ok(Json(serde_json::json!({ "status": "ok", "layoutId": req.layout_id })).into_response())
}

/// Validate a layout and forward it to the generation endpoint.
///
/// Validation failures return 422 with the full error list; pipeline failures
/// map to distinct kinds via [`AppError`].
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LayoutPayload>,
) -> Result<axum::response::Response, AppError> {
    let layout = match validate(&payload) {
        Ok(layout) => layout,
        Err(errors) => {
            let errors: Vec<_> = errors.iter().map(|e| e.to_wire()).collect();
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response());
        }
    };

    let image = state.generator.generate(&layout).await?;
    Ok(Json(serde_json::json!({ "imageUrl": image.url })).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use plancast_core::config::GeneratorConfig;

    use super::AppState;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    /// State over a temp uploads root, with no generation credential so no
    /// request can ever reach the network.
    fn test_state() -> (Arc<AppState>, TempDir) {
        let tmp = TempDir::new().expect("tempdir");
        let state = Arc::new(AppState::new(
            tmp.path(),
            GeneratorConfig::without_credential(),
        ));
        (state, tmp)
    }

    async fn send_json(
        state: Arc<AppState>,
        uri: &str,
        body: &serde_json::Value,
    ) -> axum::response::Response {
        let app = super::build_router(state);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn send_get(state: Arc<AppState>, uri: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let boundary = "X-PLANCAST-TEST-BOUNDARY";
        let mut body = Vec::new();
        for (name, file_name, bytes) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; \
                         filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_healthz() {
        let (state, _tmp) = test_state();
        let resp = send_get(state, "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_save_layout_persists_blob_verbatim() {
        let (state, tmp) = test_state();
        let request = serde_json::json!({
            "layoutId": "layout-1",
            "payload": {"free": ["form", {"json": true}]},
        });

        let resp = send_json(state, "/save-layout", &request).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["layoutId"], "layout-1");

        let stored = std::fs::read_to_string(tmp.path().join("layouts/layout-1.json"))
            .expect("layout file should exist");
        let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, request["payload"]);
    }

    #[tokio::test]
    async fn test_save_layout_rejects_path_escaping_id() {
        let (state, _tmp) = test_state();
        let request = serde_json::json!({ "layoutId": "../escape", "payload": {} });

        let resp = send_json(state, "/save-layout", &request).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["kind"], "bad_request");
    }

    #[tokio::test]
    async fn test_generate_plan_returns_full_validation_error_list() {
        let (state, _tmp) = test_state();
        let mut payload = plancast_test_utils::wire_layout_json();
        payload["rooms"][0]["doors"][0]["wallId"] = "w-404".into();
        payload["rooms"][0]["area"] = (-1.0).into();

        let resp = send_json(state, "/generate-plan", &payload).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        let errors = json["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2, "both violations reported: {json}");
        assert!(errors.iter().any(|e| e["code"] == "unresolved_wall_reference"
            && e["wall_id"] == "w-404"));
        assert!(
            errors
                .iter()
                .any(|e| e["code"] == "negative_number" && e["field"] == "area")
        );
    }

    #[tokio::test]
    async fn test_generate_plan_without_credential_is_config_error() {
        // Valid layout, no credential configured: the pipeline must fail
        // before any network I/O.
        let (state, _tmp) = test_state();
        let payload = plancast_test_utils::wire_layout_json();

        let resp = send_json(state, "/generate-plan", &payload).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "config");
    }

    #[tokio::test]
    async fn test_upload_photo_stores_file_and_returns_record() {
        let (state, tmp) = test_state();
        let app = super::build_router(state);

        let request = multipart_request(
            "/upload-photo",
            &[
                ("roomId", None, b"room-1".as_slice()),
                ("file", Some("kitchen.png"), b"fake png bytes".as_slice()),
            ],
        );
        let resp = app.oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let id = json["id"].as_str().expect("id");
        assert!(id.starts_with("room-1-"), "room-scoped id, got: {id}");
        assert_eq!(json["roomId"], "room-1");
        assert_eq!(json["name"], "kitchen.png");
        let url = json["url"].as_str().expect("url");
        assert!(url.starts_with("/uploads/photos/room-1/"), "got: {url}");

        let stored = tmp.path().join("photos/room-1").join(format!("{id}.png"));
        assert_eq!(std::fs::read(stored).expect("stored file"), b"fake png bytes");
    }

    #[tokio::test]
    async fn test_upload_photo_requires_file_field() {
        let (state, _tmp) = test_state();
        let app = super::build_router(state);

        let request =
            multipart_request("/upload-photo", &[("roomId", None, b"room-1".as_slice())]);
        let resp = app.oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["kind"], "bad_request");
    }

    #[tokio::test]
    async fn test_uploaded_files_are_served_statically() {
        let (state, tmp) = test_state();
        let dir = tmp.path().join("photos/room-1");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("pic.png"), b"png bytes").unwrap();

        let resp = send_get(state, "/uploads/photos/room-1/pic.png").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 1_048_576)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"png bytes".as_slice());
    }
}
