//! Project snapshots with versioning and migration.
//!
//! Snapshots are pretty-printed JSON wrapped with a schema version. Drag
//! state and moving sets are transient and never written.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use tackline_core::{Result, TacklineError};

use crate::project::Project;

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// On-disk envelope around a [`Project`].
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: u32,
    pub project: Project,
    /// Crate version of the writer, informational only.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
            project,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(Into::into)
    }

    /// Decode a snapshot of any supported version. Older layouts are
    /// upgraded first; tack parent ids are rebuilt from the tree.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let found = schema_version(&value);
        if found > CURRENT_VERSION {
            return Err(TacklineError::UnsupportedVersion {
                found,
                supported: CURRENT_VERSION,
            });
        }

        let mut file: Self = serde_json::from_value(upgrade(value, found)?)?;
        file.project.relink();
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), project = %self.project.name, "Project saved");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = Self::from_json(&std::fs::read(path)?)?;
        info!(
            path = %path.display(),
            project = %file.project.name,
            version = file.version,
            "Project loaded"
        );
        Ok(file)
    }
}

/// Version tag of a decoded snapshot. Untagged documents are v0.
fn schema_version(value: &Value) -> u32 {
    value
        .get("version")
        .and_then(Value::as_u64)
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Bring `value` from schema `from` up to [`CURRENT_VERSION`], one step at a
/// time.
fn upgrade(mut value: Value, from: u32) -> Result<Value> {
    for step in from..CURRENT_VERSION {
        value = match step {
            0 => wrap_bare_project(value),
            other => {
                return Err(TacklineError::Serialization(format!(
                    "no upgrade from schema version {other}"
                )))
            }
        };
    }
    Ok(value)
}

/// v0 snapshots are a bare project without an envelope.
fn wrap_bare_project(value: Value) -> Value {
    if value.get("project").is_some() {
        return value;
    }
    json!({
        "version": 1,
        "project": value,
        "app_version": "0.0.0",
    })
}
