//! Graph document loading
//!
//! The format is picked from the file extension: `.json`, `.toml`, or
//! YAML for `.yaml`, `.yml` and anything else.

use anyhow::{Context, Result};
use dagkit::GraphDocument;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Read and parse a graph document
pub fn load(path: &Path) -> Result<GraphDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read graph document: {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    log::debug!("Parsing {} as {}", path.display(), format.name());

    parse(&content, format)
        .with_context(|| format!("Invalid {} in {}", format.name(), path.display()))
}

pub fn parse(content: &str, format: DocumentFormat) -> Result<GraphDocument> {
    let document = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Toml => toml::from_str(content)?,
    };
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = r#"
region: eu-west-1
tags:
  team: data
nodes:
  - id: logs
    type: fs.dir
    props:
      path: /tmp/logs
  - id: current
    type: fs.symlink
    props:
      target: /tmp/current
edges:
  - from: logs
    to: current
    via: path
"#;

    fn assert_sample(doc: &GraphDocument) {
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].kind, "fs.dir");
        assert_eq!(doc.nodes[0].str_property("path"), Some("/tmp/logs"));
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].via, "path");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("g.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("g.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("g.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("g.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("graph")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_parse_yaml() {
        let doc = parse(YAML, DocumentFormat::Yaml).unwrap();
        assert_sample(&doc);
        assert_eq!(doc.region.as_deref(), Some("eu-west-1"));
        assert_eq!(doc.tags.get("team").map(String::as_str), Some("data"));
    }

    #[test]
    fn test_parse_json() {
        let doc = parse(
            r#"{
                "nodes": [
                    {"id": "logs", "type": "fs.dir", "props": {"path": "/tmp/logs"}},
                    {"id": "current", "kind": "fs.symlink", "properties": {"target": "/tmp/current"}}
                ],
                "edges": [{"from": "logs", "to": "current", "via": "path"}]
            }"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_sample(&doc);
    }

    #[test]
    fn test_parse_toml() {
        let doc = parse(
            r#"
[[nodes]]
id = "logs"
type = "fs.dir"
props = { path = "/tmp/logs" }

[[nodes]]
id = "current"
type = "fs.symlink"
props = { target = "/tmp/current" }

[[edges]]
from = "logs"
to = "current"
via = "path"
"#,
            DocumentFormat::Toml,
        )
        .unwrap();
        assert_sample(&doc);
    }

    #[test]
    fn test_missing_edges_means_none() {
        let doc = parse("nodes:\n  - id: a\n    type: fs.dir\n", DocumentFormat::Yaml).unwrap();
        assert!(doc.edges.is_empty());
        assert!(doc.nodes[0].properties.is_empty());
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid JSON"), "{message}");
        assert!(message.contains("broken.json"), "{message}");
    }

    #[test]
    fn test_load_unknown_extension_as_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.dag");
        std::fs::write(&path, YAML).unwrap();
        assert_sample(&load(&path).unwrap());
    }
}
