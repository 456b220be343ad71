use std::path::PathBuf;

use http::Response;
use tracing::{debug, warn};

use crate::cache;
use crate::mime;
use crate::response;

/// Serves files beneath a fixed root directory.
///
/// Responses carry `ETag` and `Cache-Control` headers; a request whose
/// `If-None-Match` matches gets 304. Paths resolving outside the root after
/// canonicalization are treated as missing.
pub struct StaticDir {
    root: PathBuf,
    cache_control: String,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>, cache_control: String) -> Self {
        Self {
            root: root.into(),
            cache_control,
        }
    }

    pub async fn serve(&self, path: &str, if_none_match: Option<&str>) -> Response<Vec<u8>> {
        match self.load(path).await {
            Some((body, content_type)) => {
                let etag = cache::generate_etag(&body);
                if cache::etag_matches(if_none_match, &etag) {
                    return response::not_modified(&etag, &self.cache_control);
                }
                response::ok(body, content_type, &etag, &self.cache_control)
            }
            None => response::not_found(),
        }
    }

    async fn load(&self, path: &str) -> Option<(Vec<u8>, &'static str)> {
        // Strip the leading slash and neuter traversal segments before
        // joining onto the root.
        let relative = path.trim_start_matches('/').replace("..", "");
        let candidate = self.root.join(&relative);

        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "static root not accessible");
                return None;
            }
        };

        // A path that does not resolve is an ordinary 404.
        let Ok(resolved) = tokio::fs::canonicalize(&candidate).await else {
            return None;
        };
        if !resolved.starts_with(&root) {
            warn!(path, resolved = %resolved.display(), "path escaping static root rejected");
            return None;
        }

        let body = match tokio::fs::read(&resolved).await {
            Ok(b) => b,
            Err(e) => {
                debug!(path = %resolved.display(), error = %e, "static file read failed");
                return None;
            }
        };

        let content_type = mime::content_type(resolved.extension().and_then(|e| e.to_str()));
        Some((body, content_type))
    }
}
