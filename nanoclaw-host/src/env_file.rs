//! Reading secrets from a `.env` file
//!
//! Only the keys a caller asks for are returned, so unrelated secrets in
//! the same file never reach a child process environment.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use nanoclaw_utils::{NanoclawError, Result};

/// Read `keys` from the env file at `path`
///
/// A missing file yields an empty map. Later assignments win. The process
/// environment is never modified.
pub fn read_env_file(path: &Path, keys: &[&str]) -> Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "No env file");
            return Ok(HashMap::new());
        }
        Err(dotenvy::Error::Io(e)) => {
            return Err(NanoclawError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => return Err(NanoclawError::config(format!("{}: {}", path.display(), e))),
    };

    let mut values = HashMap::new();
    for entry in entries {
        match entry {
            Ok((key, value)) if keys.contains(&key.as_str()) => {
                values.insert(key, value);
            }
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping env file line"),
        }
    }
    Ok(values)
}
