//! Manifest parsing and build orchestration
//!
//! Parses das.toml and converts every listed model.

use anyhow::{Context, Result};
use das_common::DAS_EXT;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::convert::{ConvertOptions, convert_obj};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub meta: MetaConfig,
    /// Sorted by name so builds are reproducible
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

/// Header text written into every built model
#[derive(Debug, Deserialize, Default)]
pub struct MetaConfig {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        smooth_normals: bool,
        #[serde(default)]
        parallel: bool,
    },
}

impl ModelEntry {
    pub fn path(&self) -> &Path {
        match self {
            ModelEntry::Simple(p) => p,
            ModelEntry::Detailed { path, .. } => path,
        }
    }

    /// Conversion options for this entry, with header text from `meta`.
    pub fn options(&self, meta: &MetaConfig) -> ConvertOptions {
        let (smooth_normals, parallel) = match self {
            ModelEntry::Simple(_) => (false, false),
            ModelEntry::Detailed {
                smooth_normals,
                parallel,
                ..
            } => (*smooth_normals, *parallel),
        };
        ConvertOptions {
            smooth_normals,
            parallel,
            author: meta.author.clone(),
            comment: meta.comment.clone(),
        }
    }
}

fn is_obj(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("obj"))
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.models {
        if !entry.path().exists() {
            anyhow::bail!("Model '{}' source not found: {:?}", name, entry.path());
        }
        if !is_obj(entry.path()) {
            anyhow::bail!(
                "Unsupported model format for '{}': {:?} (use .obj)",
                name,
                entry.path()
            );
        }
    }
    Ok(())
}

/// Build all models from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    validate(manifest)?;

    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    if manifest.models.is_empty() {
        tracing::warn!("Manifest lists no models, nothing to build");
    }

    for (name, entry) in &manifest.models {
        let output = output_dir.join(format!("{}.{}", name, DAS_EXT));
        tracing::info!("Converting model: {} -> {:?}", name, output);

        let report = convert_obj(entry.path(), &output, &entry.options(&manifest.meta))
            .with_context(|| format!("Failed to build model '{}'", name))?;
        if !report.diagnostics.is_empty() {
            tracing::warn!(
                "Model '{}' converted with {} diagnostics",
                name,
                report.diagnostics.len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = toml::from_str(
            r#"
            [meta]
            author = "studio"

            [models]
            crate = "models/crate.obj"
            barrel = { path = "models/barrel.obj", smooth_normals = true }
            "#,
        )
        .unwrap();

        assert_eq!(manifest.output.dir, PathBuf::from("assets/"));
        assert_eq!(manifest.meta.author, "studio");
        assert_eq!(manifest.meta.comment, "");

        let names: Vec<_> = manifest.models.keys().map(String::as_str).collect();
        assert_eq!(names, ["barrel", "crate"]);

        let barrel = &manifest.models["barrel"];
        assert_eq!(barrel.path(), Path::new("models/barrel.obj"));
        let options = barrel.options(&manifest.meta);
        assert!(options.smooth_normals);
        assert!(!options.parallel);
        assert_eq!(options.author, "studio");

        let options = manifest.models["crate"].options(&manifest.meta);
        assert!(!options.smooth_normals);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest: Manifest = toml::from_str("[output]\ndir = \"out\"").unwrap();
        assert_eq!(manifest.output.dir, PathBuf::from("out"));
        assert!(manifest.models.is_empty());
        assert!(validate(&manifest).is_ok());
    }

    #[test]
    fn test_validate_missing_source() {
        let manifest: Manifest =
            toml::from_str("[models]\nghost = \"does/not/exist.obj\"").unwrap();
        let error = validate(&manifest).unwrap_err();
        assert!(error.to_string().contains("ghost"));
    }

    #[test]
    fn test_validate_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mesh.gltf");
        std::fs::write(&source, "{}").unwrap();

        let manifest = Manifest {
            output: OutputConfig::default(),
            meta: MetaConfig::default(),
            models: BTreeMap::from([("mesh".to_string(), ModelEntry::Simple(source))]),
        };
        let error = validate(&manifest).unwrap_err();
        assert!(error.to_string().contains("Unsupported"));
    }
}
