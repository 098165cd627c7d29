//! Private key file loading.
//!
//! One key per line, optional `0x` prefix. Anything that is not exactly
//! 64 hex characters after trimming is dropped without error.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Length of a 32-byte key in hex.
pub const KEY_HEX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid private keys found in {0}")]
    NoUsableKeys(PathBuf),
}

/// Normalize key file text into the list of usable hex keys, in file order.
pub fn parse_keys(text: &str) -> Vec<String> {
    let mut discarded = 0usize;
    let keys: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let key = line.strip_prefix("0x").unwrap_or(line);
            if key.len() == KEY_HEX_LEN && key.bytes().all(|b| b.is_ascii_hexdigit()) {
                Some(key.to_string())
            } else {
                discarded += 1;
                None
            }
        })
        .collect();

    if discarded > 0 {
        tracing::debug!(discarded, "Ignored malformed key lines");
    }
    keys
}

/// Read and normalize a key file; an empty result is an error.
pub fn load_keys(path: &Path) -> Result<Vec<String>, KeyError> {
    let text = fs::read_to_string(path).map_err(|source| KeyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let keys = parse_keys(&text);
    if keys.is_empty() {
        return Err(KeyError::NoUsableKeys(path.to_path_buf()));
    }

    tracing::info!(count = keys.len(), path = %path.display(), "Loaded private keys");
    Ok(keys)
}
