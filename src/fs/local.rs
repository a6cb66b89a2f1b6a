//! [`FileSystem`] over the local disk.

use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use super::{FileSystem, Listing};
use crate::context::Context;
use crate::engine::tools::should_include_in_walk;
use crate::error::BoxError;

/// Options for [`LocalFs`].
#[derive(Clone, Debug, Default)]
pub struct LocalFsOpts {
    /// Follow symbolic links. Links to directories are expanded and link targets are measured.
    /// Cycles are not detected; a link back into its own ancestry is walked until the OS refuses.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`), matched against the entry
    /// name and its full path.
    pub exclude: Vec<String>,
}

/// Local filesystem. Directory and file handles are paths.
///
/// Anything that is not a directory (after link resolution when following links) is a file, so an
/// unfollowed symlink counts with the size of the link itself.
#[derive(Clone, Debug, Default)]
pub struct LocalFs {
    opts: LocalFsOpts,
}

impl LocalFs {
    pub fn new(opts: LocalFsOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &LocalFsOpts {
        &self.opts
    }
}

impl FileSystem for LocalFs {
    type Dir = PathBuf;
    type File = PathBuf;

    fn list_children(
        &self,
        ctx: &Context,
        dir: &PathBuf,
    ) -> Result<Listing<PathBuf, PathBuf>, BoxError> {
        ctx.check()?;
        let mut listing = Listing::default();
        let walk = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.opts.follow_links);
        for entry in walk {
            let entry = entry?;
            if !should_include_in_walk(entry.path(), &self.opts.exclude) {
                continue;
            }
            if entry.file_type().is_dir() {
                listing.dirs.push(entry.into_path());
            } else {
                listing.files.push(entry.into_path());
            }
        }
        Ok(listing)
    }

    fn stat_size(&self, ctx: &Context, file: &PathBuf) -> Result<u64, BoxError> {
        ctx.check()?;
        let meta = match self.opts.follow_links {
            true => fs::metadata(file)?,
            false => fs::symlink_metadata(file)?,
        };
        Ok(meta.len())
    }
}
