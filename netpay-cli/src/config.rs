//! Rate schedule loading.
//!
//! A schedule file is TOML and only needs the values it changes; see
//! [`RateSchedule`] for the layout. Without a file the built-in 2026
//! schedule is used.
//!
//! ```toml
//! tax_year = 2027
//!
//! [social_insurance]
//! pension_rate = "0.05"
//! ```

use std::path::{Path, PathBuf};

use netpay_core::{RateSchedule, RateScheduleError};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a rate schedule file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read rate schedule '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse rate schedule '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid rate schedule '{}': {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: RateScheduleError,
    },
}

/// Loads and validates the schedule at `path`, or returns the built-in
/// schedule when `path` is `None`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, is not valid TOML
/// for a [`RateSchedule`], or fails [`RateSchedule::validate`].
pub fn load_schedule(path: Option<&Path>) -> Result<RateSchedule, ConfigError> {
    let Some(path) = path else {
        return Ok(RateSchedule::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let schedule = parse_schedule(&contents, path)?;
    info!(
        path = %path.display(),
        tax_year = schedule.tax_year,
        "rate schedule loaded"
    );
    Ok(schedule)
}

fn parse_schedule(
    contents: &str,
    path: &Path,
) -> Result<RateSchedule, ConfigError> {
    let schedule: RateSchedule = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    schedule.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(schedule)
}
