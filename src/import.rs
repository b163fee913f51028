//! Reading externally supplied chains from disk for validation.
//!
//! Two layouts are accepted: a single file holding a JSON array of blocks,
//! or a directory of `*.json` files with one block each. Blocks are kept as
//! untyped JSON so malformed entries reach the validator instead of
//! failing the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not hold a JSON array of blocks")]
    NotAnArray { path: PathBuf },
}

/// Load a chain from a file or a directory, whichever `path` is.
pub fn load_chain(path: &Path) -> Result<Vec<Value>, ImportError> {
    if path.is_dir() {
        load_chain_dir(path)
    } else {
        load_chain_file(path)
    }
}

/// Load a file holding a JSON array of blocks, in file order.
pub fn load_chain_file(path: &Path) -> Result<Vec<Value>, ImportError> {
    match read_json(path)? {
        Value::Array(blocks) => Ok(blocks),
        _ => Err(ImportError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

/// Load all `*.json` files from the directory and sort them by `index`.
/// Entries without a usable index sort last, in file name order.
pub fn load_chain_dir(dir: &Path) -> Result<Vec<Value>, ImportError> {
    let io_err = |source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = vec![];
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let p = entry.map_err(io_err)?.path();
        if p.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(p);
        }
    }
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for p in &paths {
        out.push(read_json(p)?);
    }
    out.sort_by_key(|v| v.get("index").and_then(Value::as_u64).unwrap_or(u64::MAX));
    Ok(out)
}

fn read_json(path: &Path) -> Result<Value, ImportError> {
    let buf = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&buf).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
