//! Model loading with a non-fatal downgrade policy.
//!
//! Any failure to read, decode or validate the model file collapses into
//! "model unavailable": the caller gets a [`ModelLoad`] without a model and
//! the fixed [`UNAVAILABLE_WARNING`] to show the user. Nothing propagates,
//! nothing is retried. The specific [`LoadFailure`] is kept for logs and
//! `inspect`, but user-facing messaging does not distinguish causes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::prophet::{ModelError, ProphetModel};

/// The single warning shown whenever the model cannot be used.
pub const UNAVAILABLE_WARNING: &str = "Forecast model not available. Using simulated data.";

/// Why a model is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("model file {path} does not exist")]
    Missing { path: PathBuf },

    #[error("model file {path} could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("model file {path} could not be decoded: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("model file {path} uses an unsupported feature: {reason}")]
    Unsupported { path: PathBuf, reason: String },
}

impl LoadFailure {
    /// Short machine-friendly label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadFailure::Missing { .. } => "missing",
            LoadFailure::Unreadable { .. } => "unreadable",
            LoadFailure::Malformed { .. } => "malformed",
            LoadFailure::Unsupported { .. } => "unsupported",
        }
    }
}

/// A successfully loaded model and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: ProphetModel,
    pub path: PathBuf,
    /// BLAKE3 hex digest of the file bytes.
    pub fingerprint: String,
}

impl LoadedModel {
    /// First 12 hex digits, for display.
    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..self.fingerprint.len().min(12)]
    }
}

/// Outcome of one load attempt.
#[derive(Debug, Clone)]
pub struct ModelLoad {
    outcome: Result<LoadedModel, LoadFailure>,
}

impl ModelLoad {
    pub fn loaded(model: LoadedModel) -> Self {
        Self { outcome: Ok(model) }
    }

    pub fn unavailable(failure: LoadFailure) -> Self {
        Self {
            outcome: Err(failure),
        }
    }

    pub fn available(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.outcome.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.outcome.as_ref().err()
    }

    /// The user-visible warning, present exactly when the model is unavailable.
    pub fn warning(&self) -> Option<&'static str> {
        if self.available() {
            None
        } else {
            Some(UNAVAILABLE_WARNING)
        }
    }
}

/// Attempt to load the model at `path`. Never fails; see [`ModelLoad`].
pub fn load_model(path: &Path) -> ModelLoad {
    match try_load(path) {
        Ok(loaded) => {
            tracing::info!(
                path = %loaded.path.display(),
                fingerprint = loaded.short_fingerprint(),
                growth = loaded.model.growth().label(),
                "forecast model loaded"
            );
            ModelLoad::loaded(loaded)
        }
        Err(failure) => {
            tracing::warn!(kind = failure.kind(), "{failure}; falling back to simulated forecast");
            ModelLoad::unavailable(failure)
        }
    }
}

fn try_load(path: &Path) -> Result<LoadedModel, LoadFailure> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadFailure::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadFailure::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    let fingerprint = blake3::hash(&bytes).to_hex().to_string();

    let text = std::str::from_utf8(&bytes).map_err(|e| LoadFailure::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let model = ProphetModel::from_json(text).map_err(|e| match e {
        ModelError::Unsupported(reason) => LoadFailure::Unsupported {
            path: path.to_path_buf(),
            reason,
        },
        other => LoadFailure::Malformed {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    Ok(LoadedModel {
        model,
        path: path.to_path_buf(),
        fingerprint,
    })
}
