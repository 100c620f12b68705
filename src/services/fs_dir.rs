//! `fs.dir` - a directory on the local filesystem

use anyhow::{Context, Result, bail};
use dagkit::{DeployContext, Node, PortDescriptor, Record, ReferenceTable, ResourceService, Teardown};
use serde_json::Value;
use std::fs;

use super::{PATH_PORT, path_property, record_with_path};

/// Creates a directory (and its parents); teardown removes it when empty
#[derive(Debug)]
pub struct FsDir;

impl ResourceService for FsDir {
    fn kind(&self) -> &'static str {
        "fs.dir"
    }

    fn description(&self) -> &'static str {
        "Local directory"
    }

    fn ports(&self) -> PortDescriptor {
        PortDescriptor::new([PATH_PORT], [PATH_PORT])
    }

    fn deploy(&self, node: &Node, _ctx: &DeployContext<'_>, _refs: &ReferenceTable) -> Result<Record> {
        let path = path_property(node, "path")?;
        if path.exists() && !path.is_dir() {
            bail!("{} exists and is not a directory", path.display());
        }

        let created = !path.exists();
        if created {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }

        let mut record = record_with_path(&path);
        record.insert("created".into(), Value::Bool(created));
        Ok(record)
    }

    fn teardown(&self) -> Option<&dyn Teardown> {
        Some(self)
    }
}

impl Teardown for FsDir {
    fn destroy(&self, node: &Node, _ctx: &DeployContext<'_>) -> Result<()> {
        let path = path_property(node, "path")?;
        if !path.exists() {
            log::debug!("{} already gone", path.display());
            return Ok(());
        }
        fs::remove_dir(&path)
            .with_context(|| format!("Failed to remove directory (is it empty?): {}", path.display()))
    }
}
