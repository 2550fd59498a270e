//! Archive retrieval.
//!
//! [`ArchiveSource`] is the seam between the pipeline and the network. The
//! HTTP implementation streams the published zip to disk; tests substitute
//! their own sources.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info, warn};

use crate::checksum::compute_file_sha256;
use crate::error::FetchError;
use crate::layout::{archive_url, partial_path};

/// Default HTTP timeout; annual archives run to several hundred megabytes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A place annual survey archives can be fetched from.
pub trait ArchiveSource {
    /// Where the archive for `year` lives, for diagnostics.
    fn locate(&self, year: i32) -> String;

    /// Write the archive for `year` to `dest`.
    fn fetch(&self, year: i32, dest: &Path) -> Result<(), FetchError>;
}

/// Downloads archives over HTTP(S).
pub struct HttpArchiveSource {
    client: Client,
    base_url: String,
}

impl HttpArchiveSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn locate(&self, year: i32) -> String {
        archive_url(&self.base_url, year)
    }

    fn fetch(&self, year: i32, dest: &Path) -> Result<(), FetchError> {
        let url = self.locate(year);
        info!(year, url = %url, "downloading archive");

        let transport = |message: String| FetchError::Transport {
            url: url.clone(),
            message,
        };
        let mut response = self
            .client
            .get(&url)
            .header(
                USER_AGENT,
                format!("brfss-pipeline/{}", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { url });
        }
        if !status.is_success() {
            return Err(transport(format!("HTTP {status}")));
        }

        let mut file = File::create(dest).map_err(|source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| transport(e.to_string()))?;
        debug!(year, bytes, "archive body received");
        Ok(())
    }
}

/// Make sure the archive for `year` is at `path`, fetching it if absent.
///
/// Returns `true` when the source was invoked. The archive is written to a
/// `.part` sibling first so an interrupted download never looks complete.
pub fn ensure_archive(
    source: &dyn ArchiveSource,
    year: i32,
    path: &Path,
) -> Result<bool, FetchError> {
    if path.exists() {
        info!(year, path = %path.display(), "archive already present, skipping download");
        return Ok(false);
    }
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let part = partial_path(path);
    if let Err(err) = source.fetch(year, &part) {
        let _ = std::fs::remove_file(&part);
        return Err(err);
    }
    std::fs::rename(&part, path).map_err(io_err)?;

    match compute_file_sha256(path) {
        Ok(digest) => info!(year, sha256 = %digest, path = %path.display(), "archive downloaded"),
        Err(e) => warn!(year, error = %e, "could not checksum archive"),
    }
    Ok(true)
}
