//! JSON file writer
//!
//! Every file is written whole, pretty-printed with two-space indentation,
//! replacing whatever was at that path before.

use std::path::{Path, PathBuf};

use chordanalyzr_core::{ExportError, ExportResult};
use serde::Serialize;

/// The directory the static files go into.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory and its parents. Succeeds if it already exists.
    pub fn ensure(&self) -> ExportResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| ExportError::io(&self.root, e))?;
        tracing::info!(path = %self.root.display(), "Output directory: {}", self.root.display());
        Ok(())
    }

    /// Serialize `data` to `<root>/<file_name>` and return the full path.
    pub fn write_json<T>(&self, file_name: &str, data: &T) -> ExportResult<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let path = self.root.join(file_name);
        save_json_file(data, &path)?;
        Ok(path)
    }
}

/// Write `data` as indented JSON to `path`, overwriting any existing file.
pub fn save_json_file<T>(data: &T, path: &Path) -> ExportResult<()>
where
    T: Serialize + ?Sized,
{
    let contents = serde_json::to_string_pretty(data)?;
    std::fs::write(path, contents).map_err(|e| ExportError::io(path, e))?;
    tracing::info!(path = %path.display(), "Saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ensure_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let out = OutputDir::new(tmp.path().join("nested/static"));
        out.ensure()?;
        out.ensure()?;
        assert!(out.path().is_dir());
        Ok(())
    }

    #[test]
    fn test_two_space_indent() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let out = OutputDir::new(tmp.path());
        let path = out.write_json("modes.json", &json!([{ "id": 1, "name": "Ionian" }]))?;
        let written = std::fs::read_to_string(path)?;
        assert_eq!(written, "[\n  {\n    \"id\": 1,\n    \"name\": \"Ionian\"\n  }\n]");
        Ok(())
    }

    #[test]
    fn test_overwrites_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let out = OutputDir::new(tmp.path());
        out.write_json("index.json", &json!({ "stale": true }))?;
        let path = out.write_json("index.json", &json!({ "fresh": true }))?;
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(value, json!({ "fresh": true }));
        Ok(())
    }

    #[test]
    fn test_missing_directory_reports_path() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let out = OutputDir::new(tmp.path().join("never-created"));
        match out.write_json("modes.json", &json!([])) {
            Err(ExportError::Io { path, .. }) => assert!(path.ends_with("modes.json")),
            other => return Err(format!("expected Io error, got {:?}", other).into()),
        }
        Ok(())
    }
}
