//! dirsizer: concurrent directory size aggregator with cooperative cancellation.
//!
//! [`Sizer`] walks any [`FileSystem`] with a fixed pool of directory workers and one file
//! aggregator, and returns the total byte size and file count of the tree. Traversal stops on the
//! first listing or stat error, or as soon as the [`Context`] is cancelled.
//!
//! ```no_run
//! use dirsizer::{Context, LocalFs, Sizer, SizerOpts};
//! use std::path::PathBuf;
//!
//! let ctx = Context::new();
//! let sizer = Sizer::new(LocalFs::default(), SizerOpts::with_workers(8));
//! let totals = sizer.size(&ctx, PathBuf::from("/var/log"))?;
//! println!("{} bytes in {} files", totals.size, totals.count);
//! # Ok::<(), dirsizer::SizerError>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod fs;
pub mod gate;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use context::{Cancelled, Context};
pub use error::{BoxError, SizerError};
pub use fs::{FileSystem, Listing, LocalFs, LocalFsOpts};
pub use pipeline::Sizer;
pub use types::*;

use log::debug;

/// Single entry point: size the tree under `root` in `fs` with `opts`.
///
/// Equivalent to `Sizer::new(fs, opts.clone()).size(ctx, root)`; keep a [`Sizer`] around instead
/// when sizing several roots with the same filesystem.
pub fn size_dir<F: FileSystem>(
    ctx: &Context,
    fs: F,
    root: F::Dir,
    opts: &SizerOpts,
) -> Result<SizeResult, SizerError> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    Sizer::new(fs, opts.clone()).size(ctx, root)
}
