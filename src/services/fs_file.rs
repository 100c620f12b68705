//! `fs.file` - a file with literal content

use anyhow::{Context, Result, bail};
use dagkit::{DeployContext, Node, PortDescriptor, Record, ReferenceTable, ResourceService, Teardown};
use serde_json::Value;
use std::fs;

use super::{PATH_PORT, path_property, record_with_path};

/// Writes `content` to `path`, creating parent directories
///
/// The file is rewritten only when its content differs.
#[derive(Debug)]
pub struct FsFile;

impl ResourceService for FsFile {
    fn kind(&self) -> &'static str {
        "fs.file"
    }

    fn description(&self) -> &'static str {
        "Local file with literal content"
    }

    fn ports(&self) -> PortDescriptor {
        PortDescriptor::new([PATH_PORT], [PATH_PORT])
    }

    fn deploy(&self, node: &Node, _ctx: &DeployContext<'_>, _refs: &ReferenceTable) -> Result<Record> {
        let path = path_property(node, "path")?;
        let content = match node.property("content") {
            None => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => bail!("node '{}' content must be a string, got {}", node.id, other),
        };

        if path.is_dir() {
            bail!("{} is a directory", path.display());
        }
        let changed = !fs::read_to_string(&path).is_ok_and(|current| current == content);

        if changed {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory: {}", parent.display())
                })?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }

        let mut record = record_with_path(&path);
        record.insert("bytes".into(), Value::from(content.len()));
        record.insert("changed".into(), Value::Bool(changed));
        Ok(record)
    }

    fn teardown(&self) -> Option<&dyn Teardown> {
        Some(self)
    }
}

impl Teardown for FsFile {
    fn destroy(&self, node: &Node, _ctx: &DeployContext<'_>) -> Result<()> {
        let path = path_property(node, "path")?;
        if !path.exists() {
            return Ok(());
        }
        if path.is_dir() {
            bail!("Refusing to remove directory {}", path.display());
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove file: {}", path.display()))
    }
}
