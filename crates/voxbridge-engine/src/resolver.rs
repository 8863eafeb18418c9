use std::path::{Path, PathBuf};
use voxbridge_core::EngineError;

/// Environment variable naming the model directory directly, checked when no
/// explicit path is configured.
pub const MODEL_DIR_ENV: &str = "VOXBRIDGE_MODEL_DIR";

/// Resolve the model directory once, before the session starts.
///
/// An explicit path (config or CLI) is authoritative: if it is not a
/// directory, resolution fails without falling back. Otherwise candidates are
/// tried in order: `$VOXBRIDGE_MODEL_DIR`, `<exe_dir>/models/<name>`,
/// `<exe_dir>/../models/<name>` (packaged install layout, models next to the
/// application resources), then `./models/<name>`. The error names every
/// candidate that was checked.
pub fn resolve_model_dir(
    explicit: Option<&Path>,
    model_name: &str,
) -> Result<PathBuf, EngineError> {
    if let Some(path) = explicit {
        if path.is_dir() {
            tracing::info!(path = %path.display(), "using configured model directory");
            return Ok(path.to_path_buf());
        }
        return Err(EngineError::ModelNotFound {
            model: model_name.to_string(),
            searched: vec![path.to_path_buf()],
        });
    }

    let mut candidates = Vec::new();
    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        candidates.push(PathBuf::from(dir));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.join("models").join(model_name));
            if let Some(resources_dir) = exe_dir.parent() {
                candidates.push(resources_dir.join("models").join(model_name));
            }
        }
    }
    candidates.push(PathBuf::from("models").join(model_name));

    for candidate in &candidates {
        if candidate.is_dir() {
            tracing::info!(path = %candidate.display(), "resolved model directory");
            return Ok(candidate.clone());
        }
    }

    Err(EngineError::ModelNotFound {
        model: model_name.to_string(),
        searched: candidates,
    })
}
