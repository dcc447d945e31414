//! .env file loading

use crate::error::{AppError, Result};
use std::path::Path;

/// Loads `.env` files into the process environment
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the working directory if it exists.
    ///
    /// Variables already present in the process environment win.
    pub fn load_env_file(debug: bool) -> Result<()> {
        let path = Path::new(".env");
        if path.exists() {
            Self::load_env_from(path)?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Load variables from a specific env file
    pub fn load_env_from(path: &Path) -> Result<()> {
        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))
    }
}
