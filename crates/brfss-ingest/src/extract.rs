//! Zip extraction of the transport file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{IngestError, Result};
use crate::layout::partial_path;

/// Extract the first `.XPT` entry of `archive` to `dest`.
///
/// Published archives name the entry inconsistently (`LLCP2020.XPT `, with
/// trailing blanks, or lowercase), so names are trimmed and compared
/// case-insensitively.
pub fn extract_xpt(archive: &Path, dest: &Path) -> Result<PathBuf> {
    let archive_err = |message: String| IngestError::Archive {
        path: archive.to_path_buf(),
        message,
    };
    let file = File::open(archive).map_err(|e| IngestError::read(archive, e))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| archive_err(e.to_string()))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| archive_err(e.to_string()))?;
        if entry.is_dir() || !is_xpt_name(entry.name()) {
            continue;
        }
        let entry_name = entry.name().to_string();

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
        }
        let part = partial_path(dest);
        let mut out = File::create(&part).map_err(|e| IngestError::write(&part, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| archive_err(e.to_string()))?;
        std::fs::rename(&part, dest).map_err(|e| IngestError::write(dest, e))?;

        info!(
            archive = %archive.display(),
            entry = %entry_name.trim(),
            dest = %dest.display(),
            "transport file extracted"
        );
        return Ok(dest.to_path_buf());
    }

    Err(IngestError::NoXptInArchive {
        path: archive.to_path_buf(),
    })
}

fn is_xpt_name(name: &str) -> bool {
    name.trim().to_ascii_uppercase().ends_with(".XPT")
}
