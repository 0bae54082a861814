//! Static files embedded at compile time, served under `/s/`.

use axum::{
    extract::Path,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::stream::TEXT_PLAIN;

static ASSETS: &[(&str, &[u8])] = &[
    ("css/style.css", include_bytes!("../static/css/style.css")),
    ("favicon.svg", include_bytes!("../static/favicon.svg")),
    ("robots.txt", include_bytes!("../static/robots.txt")),
];

/// Look up an embedded file by its path relative to `static/`.
pub fn lookup(path: &str) -> Option<&'static [u8]> {
    let path = path.trim_start_matches('/');
    if path.split('/').any(|seg| seg == "..") {
        return None;
    }
    ASSETS.iter().find(|(p, _)| *p == path).map(|(_, body)| *body)
}

pub fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

pub async fn serve(Path(filepath): Path<String>) -> Response {
    match lookup(&filepath) {
        Some(body) => (StatusCode::OK, [(CONTENT_TYPE, content_type(&filepath))], body).into_response(),
        None => (StatusCode::NOT_FOUND, [(CONTENT_TYPE, TEXT_PLAIN)], "404 page not found\n").into_response(),
    }
}
