use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use jsonschema::validator_for;
use serde_json::Value;
use tracing::info;

use crate::domain::FormSchema;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// JSON Schema describing a form schema document.
pub fn document_schema() -> Result<Value> {
    let root = schemars::schema_for!(FormSchema);
    serde_json::to_value(root).context("failed to render the form document schema")
}

/// Check a parsed document against [`document_schema`], then deserialize and
/// run the structural checks of [`FormSchema::validate`].
pub fn schema_from_value(value: Value) -> Result<FormSchema> {
    let meta = document_schema()?;
    let validator = validator_for(&meta).context("failed to compile the form document schema")?;
    let problems: Vec<String> = validator
        .iter_errors(&value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect();
    if !problems.is_empty() {
        bail!("form schema document is invalid:\n  {}", problems.join("\n  "));
    }

    let schema: FormSchema =
        serde_json::from_value(value).context("failed to deserialize form schema")?;
    schema.validate().context("form schema is inconsistent")?;
    Ok(schema)
}

pub fn parse_schema_str(contents: &str, format: DocumentFormat) -> Result<FormSchema> {
    schema_from_value(parse_document_str(contents, format)?)
}

pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    let schema = parse_schema_str(&contents, format)
        .with_context(|| format!("failed to load schema from {}", path.display()))?;
    info!(path = %path.display(), %format, fields = schema.fields.len(), "loaded form schema");
    Ok(schema)
}

/// `<config dir>/labentry/schema.json`, if the platform has a config directory.
pub fn default_schema_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "abq", "labentry").map(|dirs| dirs.config_dir().join("schema.json"))
}

/// The schema at `path`, else the user's default schema file when it exists,
/// else the built-in laboratory schema.
pub fn resolve_schema(path: Option<&Path>) -> Result<FormSchema> {
    if let Some(path) = path {
        return load_schema(path);
    }
    match default_schema_path() {
        Some(path) if path.exists() => load_schema(&path),
        _ => Ok(FormSchema::abq()),
    }
}
