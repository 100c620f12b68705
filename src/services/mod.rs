//! Built-in local services
//!
//! Provider-neutral kinds backed by the local filesystem. They make the
//! CLI usable without any cloud account and double as reference plugins.

mod fs_dir;
mod fs_file;
mod fs_symlink;

pub use fs_dir::FsDir;
pub use fs_file::FsFile;
pub use fs_symlink::FsSymlink;

use anyhow::Result;
use dagkit::{Node, Record, Registry, RegistryError};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::paths;

/// Port carrying a filesystem path
pub const PATH_PORT: &str = "path";

/// Registry with every built-in kind
pub fn registry() -> Result<Registry, RegistryError> {
    Ok(Registry::builder()
        .register(FsDir)?
        .register(FsFile)?
        .register(FsSymlink)?
        .build())
}

/// Required path property, with `~` and env vars expanded
fn path_property(node: &Node, key: &str) -> Result<PathBuf> {
    Ok(paths::expand(node.require_str(key)?))
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

fn record_with_path(path: &Path) -> Record {
    let mut record = Record::new();
    record.insert(PATH_PORT.into(), path_value(path));
    record
}

#[cfg(test)]
fn test_session() -> crate::session::LocalSession {
    crate::session::LocalSession::resolve_with(
        &dagkit::GraphDocument::default(),
        &crate::config::Config::default(),
        |_| None,
    )
}
