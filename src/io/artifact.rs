//! Model artifact JSON read/write.
//!
//! The artifact is the portable representation of a finished training run:
//! fitted forest + fitted encoder + the ordered feature column lists. It is
//! written once by the `train` stage and treated as immutable afterwards.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::AppError;
use crate::io::ensure_parent_dir;
use crate::model::artifact::{ARTIFACT_TOOL, ModelArtifact};

/// Write the artifact as pretty JSON.
pub fn write_model_json(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!("Failed to create model artifact '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), artifact)
        .map_err(|e| AppError::schema(format!("Failed to write model artifact: {e}")))?;
    Ok(())
}

/// Read an artifact back and sanity-check its provenance.
pub fn read_model_json(path: &Path) -> Result<ModelArtifact, AppError> {
    if !path.exists() {
        return Err(AppError::schema(format!(
            "Model artifact not found at '{}'. Run the `train` stage first.",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|e| {
        AppError::schema(format!("Failed to open model artifact '{}': {e}", path.display()))
    })?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::schema(format!("Invalid model artifact JSON: {e}")))?;

    if artifact.tool != ARTIFACT_TOOL {
        return Err(AppError::schema(format!(
            "Model artifact was written by '{}', expected '{ARTIFACT_TOOL}'.",
            artifact.tool
        )));
    }
    if artifact.model.n_features() != artifact.feature_width() {
        return Err(AppError::schema(format!(
            "Corrupt artifact: forest expects {} features but schema lists {}.",
            artifact.model.n_features(),
            artifact.feature_width()
        )));
    }
    Ok(artifact)
}
