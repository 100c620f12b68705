//! `fs.symlink` - a link wired to an upstream path
//!
//! Deploy only records where the link will live. The link itself is made
//! during wiring, once the upstream `fs.dir` / `fs.file` has published the
//! path it points at.

use anyhow::{Context, Result, bail};
use dagkit::{
    DeployContext, Edge, EdgeWiring, Node, PortDescriptor, Record, ReferenceTable,
    ResourceService, Teardown, WireOutcome,
};
use std::fs;
use std::path::{Path, PathBuf};

use super::{PATH_PORT, path_property, path_value};

const KIND: &str = "fs.symlink";

#[derive(Debug)]
pub struct FsSymlink;

impl ResourceService for FsSymlink {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn description(&self) -> &'static str {
        "Symlink at `target` pointing to an upstream path"
    }

    fn ports(&self) -> PortDescriptor {
        PortDescriptor::new([PATH_PORT], Vec::<String>::new())
    }

    fn deploy(&self, node: &Node, _ctx: &DeployContext<'_>, _refs: &ReferenceTable) -> Result<Record> {
        let target = path_property(node, "target")?;
        if target.exists() && !target.is_symlink() {
            bail!("{} exists and is not a symlink", target.display());
        }

        let mut record = Record::new();
        record.insert("target".into(), path_value(&target));
        Ok(record)
    }

    fn wiring(&self) -> Option<&dyn EdgeWiring> {
        Some(self)
    }

    fn teardown(&self) -> Option<&dyn Teardown> {
        Some(self)
    }
}

impl EdgeWiring for FsSymlink {
    fn wire(
        &self,
        edge: &Edge,
        refs: &mut ReferenceTable,
        ctx: &DeployContext<'_>,
    ) -> Result<WireOutcome> {
        if edge.via != PATH_PORT || ctx.kind_of(&edge.to) != Some(KIND) {
            return Ok(WireOutcome::NotApplicable);
        }

        let source = refs
            .str_value(&edge.from, PATH_PORT)
            .map(PathBuf::from)
            .with_context(|| format!("node '{}' did not publish a path", edge.from))?;
        let target = refs
            .str_value(&edge.to, "target")
            .map(PathBuf::from)
            .with_context(|| format!("node '{}' has no recorded target", edge.to))?;

        link(&source, &target)?;
        refs.publish(&edge.to, "source", path_value(&source));
        Ok(WireOutcome::Applied)
    }
}

impl Teardown for FsSymlink {
    fn destroy(&self, node: &Node, _ctx: &DeployContext<'_>) -> Result<()> {
        let target = path_property(node, "target")?;
        if target.is_symlink() {
            fs::remove_file(&target)
                .with_context(|| format!("Failed to remove symlink: {}", target.display()))?;
        } else if target.exists() {
            bail!("{} is not a symlink, leaving it alone", target.display());
        }
        Ok(())
    }
}

/// Point `target` at `source`, replacing an existing link
fn link(source: &Path, target: &Path) -> Result<()> {
    if !source.exists() {
        bail!("Source does not exist: {}", source.display());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;
    }

    if target.is_symlink() {
        if fs::read_link(target).is_ok_and(|current| current == source) {
            return Ok(());
        }
        fs::remove_file(target)
            .with_context(|| format!("Failed to remove existing symlink: {}", target.display()))?;
    } else if target.exists() {
        bail!("{} exists and is not a symlink", target.display());
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(source, target).with_context(|| {
        format!(
            "Failed to create symlink: {} -> {}",
            target.display(),
            source.display()
        )
    })?;

    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};

        if source.is_dir() {
            // junctions need no admin rights
            if let Err(e) = junction::create(source, target) {
                log::debug!("Junction creation failed ({}), trying symlink_dir", e);
                symlink_dir(source, target).with_context(|| {
                    format!(
                        "Failed to create directory symlink: {} -> {}",
                        target.display(),
                        source.display()
                    )
                })?;
            }
        } else {
            symlink_file(source, target).with_context(|| {
                format!(
                    "Failed to create file symlink: {} -> {}",
                    target.display(),
                    source.display()
                )
            })?;
        }
    }

    #[cfg(not(any(unix, windows)))]
    bail!("Symlinks not supported on this platform");

    log::debug!("linked {} -> {}", target.display(), source.display());
    Ok(())
}
