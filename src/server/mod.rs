//! HTTP service: upload a report, download the generated presentation.
//!
//! Endpoints:
//!
//! - `GET /` welcome message
//! - `POST /generate-ppt/` multipart upload of the report JSON (field `input_file`)
//! - `GET /download/{filename}` a previously generated presentation
//!
//! A fixed pool of worker threads pulls requests from one listener.
pub mod config;
pub mod cors;
pub mod handler;
pub mod multipart;

pub use config::{OutputNaming, ServeArgs};
pub use cors::CorsPolicy;
pub use handler::{ApiRequest, ApiResponse, AppState, handle};

use crate::assets::{AssetFetcher, HttpFetcher, OfflineFetcher};
use std::io::{self, Read};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("failed to prepare storage directory: {0}")]
    Storage(#[source] io::Error),

    #[error("failed to start worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to set up image downloads: {0}")]
    Fetcher(#[from] crate::assets::AssetError),
}

impl AppState {
    /// Build the shared state from command line options.
    ///
    /// Creates the storage directory if needed.
    pub fn from_args(args: &ServeArgs) -> Result<Self, ServerError> {
        std::fs::create_dir_all(&args.storage_dir).map_err(ServerError::Storage)?;
        let fetcher: Box<dyn AssetFetcher> = if args.offline {
            Box::new(OfflineFetcher)
        } else {
            Box::new(HttpFetcher::new(args.fetch_timeout())?)
        };
        Ok(Self {
            storage_dir: args.storage_dir.clone(),
            cors: CorsPolicy::new(&args.allowed_origins),
            naming: args.output_naming,
            fixed_output_name: args.fixed_output_name.clone(),
            fetcher,
        })
    }
}

/// Run the service until the process is stopped.
pub fn serve(args: &ServeArgs) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_args(args)?);
    let server = tiny_http::Server::http(args.bind).map_err(|e| ServerError::Bind {
        addr: args.bind.to_string(),
        message: e.to_string(),
    })?;
    let server = Arc::new(server);
    info!(
        addr = %args.bind,
        storage = %args.storage_dir.display(),
        workers = args.workers,
        "listening"
    );

    let workers: Vec<_> = (0..args.workers)
        .map(|id| {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::Builder::new()
                .name(format!("appdeck-worker-{id}"))
                .spawn(move || worker(&server, &state))
        })
        .collect::<io::Result<_>>()
        .map_err(ServerError::Spawn)?;

    for handle in workers {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }
    Ok(())
}

fn worker(server: &tiny_http::Server, state: &AppState) {
    loop {
        let request = match server.recv() {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "failed to receive request");
                continue;
            },
        };
        serve_one(state, request);
    }
}

fn serve_one(state: &AppState, mut request: tiny_http::Request) {
    let api_request = match read_request(&mut request) {
        Ok(api_request) => api_request,
        Err(response) => {
            respond(request, response);
            return;
        },
    };

    let response = handle(state, &api_request);
    debug!(
        method = %api_request.method,
        url = %api_request.url,
        status = response.status,
        "request handled"
    );
    respond(request, response);
}

fn read_request(request: &mut tiny_http::Request) -> Result<ApiRequest, ApiResponse> {
    if request.body_length().is_some_and(|len| len as u64 > MAX_BODY_BYTES) {
        return Err(ApiResponse::detail(413, "Request body too large"));
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|err| {
            warn!(error = %err, "failed to read request body");
            ApiResponse::detail(400, "Could not read request body")
        })?;
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ApiResponse::detail(413, "Request body too large"));
    }

    Ok(ApiRequest {
        method: request.method().as_str().to_ascii_uppercase(),
        url: request.url().to_string(),
        headers: request
            .headers()
            .iter()
            .map(|h| (h.field.as_str().to_string(), h.value.as_str().to_string()))
            .collect(),
        body,
    })
}

fn respond(request: tiny_http::Request, response: ApiResponse) {
    let mut reply = tiny_http::Response::from_data(response.body).with_status_code(response.status);
    for (name, value) in &response.headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => reply.add_header(header),
            Err(()) => warn!(%name, "dropping invalid response header"),
        }
    }
    if let Err(err) = request.respond(reply) {
        warn!(error = %err, "failed to send response");
    }
}
