//! Packaged SPA content resolution.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use crate::error::FileOpsError;

/// Root document served for every path that is not a packaged file.
pub const INDEX_DOCUMENT: &str = "index.html";

/// A resolved file ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Absolute path of the served file.
    pub path: PathBuf,
    /// Guessed MIME type (`application/octet-stream` when unknown).
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Maps request paths of the content scheme onto a content root.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a request path to the file that should be served.
    ///
    /// The path is percent-decoded. A regular file under the root is returned
    /// as is; directories, missing files and anything that would leave the
    /// root get the index document. Fails with [`FileOpsError::NotFound`]
    /// only when the index document itself is missing.
    pub fn resolve_path(&self, request_path: &str) -> Result<PathBuf, FileOpsError> {
        if let Some(candidate) = self.candidate(request_path) {
            if candidate.is_file() && self.contains(&candidate) {
                return Ok(candidate);
            }
        }

        let index = self.root.join(INDEX_DOCUMENT);
        if index.is_file() {
            debug!(path = %request_path, "serving index document");
            Ok(index)
        } else {
            warn!(root = %self.root.display(), "index document missing");
            Err(FileOpsError::NotFound(index))
        }
    }

    /// Resolves and reads the file for `request_path`.
    pub fn load(&self, request_path: &str) -> Result<Asset, FileOpsError> {
        let path = self.resolve_path(request_path)?;
        let bytes = std::fs::read(&path).map_err(|e| FileOpsError::io("read", &path, e))?;
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Asset { path, mime, bytes })
    }

    /// Joins the decoded request path onto the root. `None` when the path
    /// climbs out of the root or carries a prefix.
    fn candidate(&self, request_path: &str) -> Option<PathBuf> {
        let raw = request_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let decoded = percent_decode_str(raw).decode_utf8_lossy();

        let mut path = self.root.clone();
        for component in Path::new(decoded.trim_start_matches(['/', '\\'])).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    debug!(path = %request_path, "path escapes content root");
                    return None;
                }
            }
        }
        Some(path)
    }

    /// Guards against symlinks pointing outside the root.
    fn contains(&self, candidate: &Path) -> bool {
        match (self.root.canonicalize(), candidate.canonicalize()) {
            (Ok(root), Ok(file)) => file.starts_with(root),
            _ => false,
        }
    }
}
