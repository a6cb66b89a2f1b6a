//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

use crate::utils::fd_limit::max_workers_by_fd_limit;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file name (`.dirsizer.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Sizer ----

pub struct SizerConsts;

impl SizerConsts {
    /// Directory workers when the caller does not choose.
    pub const DEFAULT_WORKERS: usize = 10;
    /// Buffered files between directory workers and the aggregator.
    pub const FILE_CHANNEL_CAP: usize = 1024;
}

// ---- Worker threads ----

/// Thread limits for picking a CLI worker count.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Floor: listing is I/O bound, so even a single core benefits from a few workers.
    pub floor: usize,
    /// Ceiling regardless of core count.
    pub max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 4;
    pub const MAX_THREADS: usize = 64;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Two workers per available thread, clamped to `[floor, max]`, then capped by the FD limit.
    pub fn workers(&self) -> usize {
        let wanted = (self.all_threads * 2).clamp(self.floor, self.max);
        match max_workers_by_fd_limit() {
            Some(fd_cap) if fd_cap < wanted => {
                log::debug!("Capping workers {} -> {} (FD limit ~80%)", wanted, fd_cap);
                fd_cap
            }
            _ => wanted,
        }
    }
}
