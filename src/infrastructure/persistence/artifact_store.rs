use crate::application::ml::artifact::ModelArtifact;
use crate::domain::errors::ModelError;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a persisted artifact bundle from disk.
pub fn load(path: &Path) -> Result<ModelArtifact, ModelError> {
    if !path.exists() {
        return Err(ModelError::ArtifactUnavailable {
            reason: format!("model artifact not found at {}", path.display()),
        });
    }

    let file = File::open(path).map_err(|e| ModelError::ArtifactUnavailable {
        reason: format!("failed to open {}: {e}", path.display()),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| ModelError::ArtifactUnavailable {
        reason: format!("failed to deserialize {}: {e}", path.display()),
    })
}

/// Persists an artifact bundle, creating parent directories as needed.
pub fn save(path: &Path, artifact: &ModelArtifact) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), artifact)
        .context("failed to serialize model artifact")?;
    Ok(())
}
