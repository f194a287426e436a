//! Request routing and endpoint handlers.
//!
//! Handlers work on plain [`ApiRequest`]/[`ApiResponse`] values so they can be
//! exercised without a socket.
use crate::assets::AssetFetcher;
use crate::error::Error;
use crate::pptx::constants::content_type;
use crate::server::config::OutputNaming;
use crate::server::cors::CorsPolicy;
use crate::server::multipart;
use serde_json::json;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Form field that carries the uploaded report.
pub const UPLOAD_FIELD: &str = "input_file";

const WELCOME: &str = "Welcome to PPT Generator API. Use /docs for API documentation.";

/// Shared state of all workers.
pub struct AppState {
    pub storage_dir: PathBuf,
    pub cors: CorsPolicy,
    pub naming: OutputNaming,
    pub fixed_output_name: String,
    pub fetcher: Box<dyn AssetFetcher>,
}

/// An HTTP request reduced to what the handlers need.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    /// Request target, possibly with a query string
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn path(&self) -> &str {
        self.url.split(['?', '#']).next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: value.to_string().into_bytes(),
        }
    }

    pub fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self::json(status, json!({ "detail": detail.into() }))
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Route a request and attach CORS headers.
pub fn handle(state: &AppState, request: &ApiRequest) -> ApiResponse {
    let origin = request.header("Origin");
    let path = request.path();

    let mut response = match (request.method.as_str(), path) {
        ("OPTIONS", _) => {
            let mut response = ApiResponse::empty(204);
            response.headers.extend(state.cors.preflight_headers(
                origin,
                request.header("Access-Control-Request-Headers"),
            ));
            return response;
        },
        ("GET", "/") => ApiResponse::json(200, json!({ "message": WELCOME })),
        ("POST", "/generate-ppt/" | "/generate-ppt") => generate(state, request),
        ("GET", p) if p.starts_with("/download/") => download(state, &p["/download/".len()..]),
        (_, "/" | "/generate-ppt/" | "/generate-ppt") => {
            ApiResponse::detail(405, "Method Not Allowed")
        },
        _ => ApiResponse::detail(404, "Not Found"),
    };
    response.headers.extend(state.cors.response_headers(origin));
    response
}

fn generate(state: &AppState, request: &ApiRequest) -> ApiResponse {
    let upload = match request
        .header("Content-Type")
        .ok_or(multipart::MultipartError::NotMultipart)
        .and_then(multipart::boundary)
        .and_then(|b| multipart::find_field(&request.body, &b, UPLOAD_FIELD))
    {
        Ok(upload) => upload,
        Err(err) => {
            warn!(error = %err, "rejected upload");
            return ApiResponse::detail(400, err.to_string());
        },
    };

    let name = state
        .naming
        .output_name(upload.filename.as_deref(), &state.fixed_output_name);
    let output = state.storage_dir.join(&name);
    info!(
        upload = upload.filename.as_deref().unwrap_or(""),
        output = %output.display(),
        "generating presentation"
    );

    match crate::generate_with(&upload.data, &output, state.fetcher.as_ref()) {
        Ok(_) if output.is_file() => ApiResponse::json(
            200,
            json!({ "message": "PPT generated successfully", "file_path": name }),
        ),
        Ok(_) => {
            error!(output = %output.display(), "generated file not found");
            ApiResponse::detail(500, "Generated file not found")
        },
        Err(Error::InvalidJson(err)) => {
            warn!(error = %err, "upload is not valid JSON");
            ApiResponse::detail(400, "Invalid JSON file")
        },
        Err(Error::Validation(message)) => {
            warn!(%message, "upload failed validation");
            ApiResponse::detail(400, message)
        },
        Err(err) => {
            error!(error = %err, "failed to generate presentation");
            ApiResponse::detail(500, "Error generating PPT")
        },
    }
}

fn download(state: &AppState, raw_name: &str) -> ApiResponse {
    let not_found = || ApiResponse::detail(404, "File not found");

    let Ok(name) = urlencoding::decode(raw_name) else {
        return not_found();
    };
    if !is_plain_file_name(&name) {
        warn!(name = %name, "rejected download name");
        return not_found();
    }

    let path = state.storage_dir.join(name.as_ref());
    match fs::read(&path) {
        Ok(data) => {
            info!(path = %path.display(), bytes = data.len(), "serving download");
            ApiResponse {
                status: 200,
                headers: vec![
                    ("Content-Type".into(), content_type::PML_DOCUMENT.into()),
                    ("Content-Disposition".into(), attachment(&name)),
                ],
                body: data,
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => not_found(),
        Err(err) if path.is_dir() => {
            warn!(error = %err, "download target is a directory");
            not_found()
        },
        Err(err) => {
            error!(error = %err, path = %path.display(), "failed to read download");
            ApiResponse::detail(500, "Error downloading file")
        },
    }
}

/// A single, non-hidden path component.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987 name.
fn attachment(name: &str) -> String {
    if name.is_ascii() && !name.contains('"') {
        format!("attachment; filename=\"{name}\"")
    } else {
        let fallback: String = name
            .chars()
            .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{fallback}\"; filename*=utf-8''{}",
            urlencoding::encode(name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::OfflineFetcher;

    fn state(dir: &std::path::Path) -> AppState {
        AppState {
            storage_dir: dir.to_path_buf(),
            cors: CorsPolicy::new(["http://localhost:3000"]),
            naming: OutputNaming::UploadStem,
            fixed_output_name: "competitive_analysis.pptx".into(),
            fetcher: Box::new(OfflineFetcher),
        }
    }

    #[test]
    fn test_root_and_unknown_routes() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = handle(&state, &ApiRequest::new("GET", "/"));
        assert_eq!(response.status, 200);
        assert_eq!(response.json_body().unwrap()["message"], WELCOME);

        let response = handle(&state, &ApiRequest::new("GET", "/nope"));
        assert_eq!(response.status, 404);
        assert_eq!(response.json_body().unwrap()["detail"], "Not Found");

        assert_eq!(handle(&state, &ApiRequest::new("DELETE", "/")).status, 405);
    }

    #[test]
    fn test_preflight() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        let request = ApiRequest::new("OPTIONS", "/generate-ppt/")
            .with_header("Origin", "http://localhost:3000")
            .with_header("Access-Control-Request-Method", "POST");
        let response = handle(&state, &request);
        assert_eq!(response.status, 204);
        assert_eq!(
            response.header("access-control-allow-origin"),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn test_download_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        for url in [
            "/download/..%2Fsecret",
            "/download/..",
            "/download/a%5Cb",
            "/download/.hidden",
            "/download/",
        ] {
            let response = handle(&state, &ApiRequest::new("GET", url));
            assert_eq!(response.status, 404, "{url}");
        }
    }

    #[test]
    fn test_download_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("報告_analysis.pptx"), b"PK data").unwrap();
        let state = state(dir.path());

        let url = format!("/download/{}", urlencoding::encode("報告_analysis.pptx"));
        let response = handle(&state, &ApiRequest::new("GET", &url));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"PK data");
        assert_eq!(
            response.header("Content-Type"),
            Some(content_type::PML_DOCUMENT)
        );
        let disposition = response.header("Content-Disposition").unwrap();
        assert!(disposition.starts_with("attachment; filename=\""));
        assert!(disposition.contains("filename*=utf-8''"));
    }

    #[test]
    fn test_attachment_header() {
        assert_eq!(attachment("a.pptx"), "attachment; filename=\"a.pptx\"");
        assert!(attachment("報告.pptx").starts_with("attachment; filename=\"__.pptx\""));
    }
}
