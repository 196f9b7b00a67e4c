// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! `.env` loading for credentials.
//!
//! Variables already present in the process environment are never
//! overwritten, so an exported `OPENAI_API_KEY` beats the file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Load variables from `path`, or from `./.env` when no path is given.
///
/// Returns the file that was loaded, if any.  A missing default `.env` is not
/// an error; a missing explicit file or a malformed one is logged and skipped.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let env_path = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".env"));

    if !env_path.is_file() {
        if path.is_some() {
            warn!(path = %env_path.display(), "env file not found");
        }
        return None;
    }

    match dotenv::from_path(&env_path) {
        Ok(()) => {
            debug!(path = %env_path.display(), "loaded env file");
            Some(env_path)
        }
        Err(e) => {
            warn!(path = %env_path.display(), error = %e, "failed to load env file");
            None
        }
    }
}
