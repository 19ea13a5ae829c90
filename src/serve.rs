//! HTTP server for the dashboard
//!
//! `dda-dashboard serve` → loads the spreadsheet, starts the server, opens the
//! browser. Requests are handled one at a time, each running to completion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info, warn};

use crate::dashboard::Dashboard;
use crate::page;
use crate::view::{ViewParams, ViewRequest};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOGO: &str = "pzt_trans.png";

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self { ok: false, data: None, error: Some(message) }
    }
}

/// Everything a request handler needs
pub struct App {
    pub dashboard: Dashboard,
    pub logo: PathBuf,
}

/// Start server, optionally open browser, serve until the process ends
pub fn start(port: u16, app: App, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::other(e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m📊 Levantamento DDA\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   {} registros carregados\n", app.dashboard.dataset().len());
    info!(%addr, "listening");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &app) {
            error!(error = %e, "failed to answer request");
        }
    }

    Ok(())
}

fn handle_request(request: Request, app: &App) -> io::Result<()> {
    let url = request.url().to_string();
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url.as_str(), ""),
    };
    let method = request.method().clone();
    debug!(%method, path, "request");

    match (&method, path) {
        (&Method::Get, "/") => {
            let view = view_request(query);
            let content = app.dashboard.render(&view);

            let mut html = Vec::new();
            page::write(&mut html, &view, &content)?;

            let response =
                Response::from_data(html).with_header(content_type("text/html; charset=utf-8")?);
            request.respond(response)
        }

        (&Method::Get, "/api/view") => {
            let view = view_request(query);
            let content = app.dashboard.render(&view);
            let json = serde_json::to_string(&ApiResponse::success(content))?;

            let response =
                Response::from_string(json).with_header(content_type("application/json")?);
            request.respond(response)
        }

        (&Method::Get, "/download") => {
            let sector = view_params(query).sector;
            match app.dashboard.download(sector.as_deref()) {
                Ok(download) => {
                    info!(
                        sector = sector.as_deref().unwrap_or(""),
                        bytes = download.bytes.len(),
                        "serving download"
                    );
                    let disposition = format!("attachment; filename=\"{}\"", download.filename);
                    let response = Response::from_data(download.bytes)
                        .with_header(content_type(download.mime)?)
                        .with_header(header("Content-Disposition", &disposition)?);
                    request.respond(response)
                }
                Err(e) => {
                    error!(error = %e, "download failed");
                    let json = serde_json::to_string(&ApiResponse::failure(e.to_string()))?;
                    let response = Response::from_string(json)
                        .with_status_code(500)
                        .with_header(content_type("application/json")?);
                    request.respond(response)
                }
            }
        }

        (&Method::Get, "/logo") => match fs::read(&app.logo) {
            Ok(bytes) => {
                let response = Response::from_data(bytes)
                    .with_header(content_type(image_mime(&app.logo))?);
                request.respond(response)
            }
            Err(e) => {
                warn!(path = %app.logo.display(), error = %e, "logo not available");
                request.respond(Response::from_string("Not found").with_status_code(404))
            }
        },

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

/// Malformed query strings are treated as empty
fn view_params(query: &str) -> ViewParams {
    serde_urlencoded::from_str(query).unwrap_or_else(|e| {
        debug!(error = %e, query, "ignoring malformed query");
        ViewParams::default()
    })
}

fn view_request(query: &str) -> ViewRequest {
    ViewRequest::from_params(&view_params(query))
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("invalid {} header: {}", name, value))
    })
}

fn content_type(value: &str) -> io::Result<Header> {
    header("Content-Type", value)
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
