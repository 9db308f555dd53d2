//! `app://` scheme serving the packaged content.

use std::borrow::Cow;
use std::path::PathBuf;

use infinity_file_ops::{AssetResolver, FileOpsError};
use tauri::http::{Request, Response, StatusCode, header};
use tauri::{AppHandle, Manager, Runtime};
use tracing::warn;

/// Directory under the resource dir holding the built content.
const CONTENT_DIR: &str = "renderer";

fn content_root<R: Runtime>(app: &AppHandle<R>) -> Option<PathBuf> {
    match app.path().resource_dir() {
        Ok(dir) => Some(dir.join(CONTENT_DIR)),
        Err(e) => {
            warn!("no resource directory: {e}");
            None
        }
    }
}

/// Answers one content request.
pub fn serve<R: Runtime>(app: &AppHandle<R>, request: &Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    let Some(root) = content_root(app) else {
        return status(StatusCode::NOT_FOUND);
    };

    match AssetResolver::new(root).load(request.uri().path()) {
        Ok(asset) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, asset.mime)
            .body(Cow::Owned(asset.bytes))
            .unwrap_or_else(|_| status(StatusCode::INTERNAL_SERVER_ERROR)),
        Err(FileOpsError::NotFound(path)) => {
            warn!(path = %path.display(), "content missing");
            status(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            warn!("failed to serve content: {e}");
            status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn status(code: StatusCode) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    *response.status_mut() = code;
    response
}
