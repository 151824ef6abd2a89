//! Reading and decoding config files.
//!
//! There are two ways a file reaches the decoder:
//!
//! - **Discovered**: the builder looks for `{dir}/{file_name}` in every
//!   [`SearchPath`]. Missing files are silently skipped; listing a search
//!   path is a suggestion, not a requirement. Found files are returned in
//!   priority-ascending order for deep-merging.
//! - **Explicit**: the caller named a specific file. A missing file is then
//!   [`TagfigError::FileNotFound`], which callers can tell apart from an
//!   unreadable file ([`TagfigError::IoError`]) or an invalid one
//!   ([`TagfigError::Decode`]).
//!
//! The decoder is never invoked for a file that does not exist.

use std::path::{Path, PathBuf};

use crate::decode::{Decoder, Mapping};
use crate::error::TagfigError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Resolve every search path, dropping the ones that cannot be resolved.
pub fn expand_search_paths(search_paths: &[SearchPath], app_name: &str) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .collect()
}

/// Read a config file.
///
/// A missing file is `Ok(None)` unless `explicit` is set, in which case it is
/// [`TagfigError::FileNotFound`]. Other I/O errors always propagate.
pub fn read_config_file(path: &Path, explicit: bool) -> Result<Option<Vec<u8>>, TagfigError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if explicit {
                Err(TagfigError::FileNotFound {
                    path: path.to_path_buf(),
                })
            } else {
                tracing::debug!(path = %path.display(), "config file not found, skipping");
                Ok(None)
            }
        }
        Err(e) => Err(TagfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Decode already-read bytes, attaching `path` to any failure.
pub fn decode_file(
    path: &Path,
    bytes: &[u8],
    decoder: &dyn Decoder,
) -> Result<Mapping, TagfigError> {
    let mapping = decoder.decode(bytes).map_err(|e| TagfigError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(
        path = %path.display(),
        decoder = decoder.name(),
        keys = mapping.len(),
        "decoded config file"
    );
    Ok(mapping)
}

/// Load a file the caller asked for by path. It must exist and decode.
pub fn load_explicit(path: &Path, decoder: &dyn Decoder) -> Result<Mapping, TagfigError> {
    let bytes = read_config_file(path, true)?.ok_or_else(|| TagfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    decode_file(path, &bytes, decoder)
}

/// Load `{dir}/{file_name}` from each directory that has it, in the given order.
pub fn load_discovered(
    dirs: &[PathBuf],
    file_name: &str,
    decoder: &dyn Decoder,
) -> Result<Vec<(PathBuf, Mapping)>, TagfigError> {
    let mut results = Vec::new();
    for dir in dirs {
        let file_path = dir.join(file_name);
        if let Some(bytes) = read_config_file(&file_path, false)? {
            let mapping = decode_file(&file_path, &bytes, decoder)?;
            results.push((file_path, mapping));
        }
    }
    Ok(results)
}
