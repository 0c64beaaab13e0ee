//! Serves the bundled browser client.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use mime_guess::{mime, MimeGuess};
use tokio::fs;
use warp::http::{header::HeaderValue, Response, StatusCode};
use warp::hyper::Body;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found")]
    NotFound,
    #[error("asset io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only file server rooted at the client directory.
///
/// Requests are resolved strictly inside the root; parent-directory
/// components are rejected rather than normalized.
#[derive(Debug, Clone)]
pub struct AssetServer {
    root: Arc<PathBuf>,
}

impl AssetServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub async fn index(&self) -> Result<warp::reply::Response, AssetError> {
        self.serve("index.html").await
    }

    pub async fn asset(&self, path: &str) -> Result<warp::reply::Response, AssetError> {
        if path.is_empty() {
            return Err(AssetError::NotFound);
        }
        self.serve(path).await
    }

    /// Map a failure to the plain-text response the browser gets.
    pub fn error_response(&self, error: AssetError) -> warp::reply::Response {
        let (status, body) = match error {
            AssetError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            AssetError::Io(ref err) => {
                tracing::error!(error = %err, "asset read failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response.headers_mut().insert(
            warp::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );
        response
    }

    async fn serve(&self, relative: &str) -> Result<warp::reply::Response, AssetError> {
        let resolved = self.resolve(relative)?;
        let bytes = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::NotFound)
            }
            Err(err) => return Err(AssetError::Io(err)),
        };

        let mime = MimeGuess::from_path(&resolved).first_or_octet_stream();
        let mut content_type = mime.essence_str().to_string();
        if mime.type_() == mime::TEXT {
            content_type.push_str("; charset=utf-8");
        }

        let mut response = Response::new(Body::from(bytes));
        response.headers_mut().insert(
            warp::http::header::CONTENT_TYPE,
            HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        );
        Ok(response)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let mut safe = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(segment) => safe.push(segment),
                Component::CurDir | Component::RootDir => {}
                Component::Prefix(_) | Component::ParentDir => return Err(AssetError::NotFound),
            }
        }
        if safe.as_os_str().is_empty() {
            return Err(AssetError::NotFound);
        }
        Ok(self.root.join(safe))
    }
}
