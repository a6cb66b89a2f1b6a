//! The filesystem abstraction the sizer consumes.

pub mod local;

pub use local::{LocalFs, LocalFsOpts};

use std::fmt::Debug;

use crate::context::Context;
use crate::error::BoxError;

/// Immediate children of one directory.
#[derive(Clone, Debug)]
pub struct Listing<D, F> {
    pub dirs: Vec<D>,
    pub files: Vec<F>,
}

impl<D, F> Default for Listing<D, F> {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// A tree of directories and files that the sizer can expand and measure.
///
/// Handles are opaque to the sizer: each directory handle is listed exactly once and each file
/// handle is measured exactly once. `Debug` is only used to name the handle in error messages.
///
/// Both operations should start with `ctx.check()?` so a cancelled traversal fails fast instead of
/// doing more I/O. An error that downcasts to [`Cancelled`](crate::Cancelled) while `ctx` is
/// cancelled is reported as cancellation rather than as a listing or stat failure.
pub trait FileSystem: Sync {
    type Dir: Send + Debug;
    type File: Send + Debug;

    fn list_children(
        &self,
        ctx: &Context,
        dir: &Self::Dir,
    ) -> Result<Listing<Self::Dir, Self::File>, BoxError>;

    fn stat_size(&self, ctx: &Context, file: &Self::File) -> Result<u64, BoxError>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    type Dir = T::Dir;
    type File = T::File;

    fn list_children(
        &self,
        ctx: &Context,
        dir: &Self::Dir,
    ) -> Result<Listing<Self::Dir, Self::File>, BoxError> {
        (**self).list_children(ctx, dir)
    }

    fn stat_size(&self, ctx: &Context, file: &Self::File) -> Result<u64, BoxError> {
        (**self).stat_size(ctx, file)
    }
}
