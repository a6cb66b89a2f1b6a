//! Public and internal types for the dirsizer API and pipeline.

use std::ops::AddAssign;
use std::path::PathBuf;

use crate::fs::LocalFsOpts;
use crate::utils::config::SizerConsts;

/// Total size of a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SizeResult {
    /// Sum of reported file sizes in bytes.
    pub size: u64,
    /// Number of files measured.
    pub count: u64,
}

impl SizeResult {
    pub fn new(size: u64, count: u64) -> Self {
        Self { size, count }
    }

    /// Fold one file of `size` bytes into the totals.
    pub fn add(&mut self, size: u64) {
        self.size += size;
        self.count += 1;
    }
}

impl AddAssign for SizeResult {
    fn add_assign(&mut self, rhs: Self) {
        self.size += rhs.size;
        self.count += rhs.count;
    }
}

/// Lib options for [`Sizer`](crate::Sizer).
#[derive(Clone, Debug)]
pub struct SizerOpts {
    /// Directory worker count. 0 is treated as 1.
    pub workers: usize,
    /// Capacity of the channel between directory workers and the file aggregator.
    pub file_channel_cap: usize,
}

impl Default for SizerOpts {
    fn default() -> Self {
        Self {
            workers: SizerConsts::DEFAULT_WORKERS,
            file_channel_cap: SizerConsts::FILE_CHANNEL_CAP,
        }
    }
}

impl SizerOpts {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}

/// Full options (CLI). Use [`SizerOpts`] and [`LocalFsOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Override directory worker count. When None, derived from available threads and FD limit.
    pub workers: Option<usize>,
    /// Result channel capacity. When None, [`SizerConsts::FILE_CHANNEL_CAP`].
    pub channel_cap: Option<usize>,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax).
    pub exclude: Vec<String>,
    /// Give up after this many seconds.
    pub timeout_secs: Option<u64>,
    /// Print only the byte count.
    pub bytes_only: bool,
    /// Debug logging.
    pub verbose: bool,
    /// Use this config file instead of `.dirsizer.toml` in the target directory.
    pub config_path: Option<PathBuf>,
}

impl From<&Opts> for LocalFsOpts {
    fn from(o: &Opts) -> Self {
        LocalFsOpts {
            follow_links: o.follow_links,
            exclude: o.exclude.clone(),
        }
    }
}
