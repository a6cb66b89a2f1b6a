//! Channels and shared state for one traversal. Built fresh by [`Sizer::size`](crate::Sizer::size)
//! and dropped when it returns.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use super::error_handler::FirstError;
use super::termination::{Outcome, Termination};
use crate::context::Context;
use crate::error::{BoxError, SizerError, cancellation_cause};

/// Work queue (directories) and result channel (files).
///
/// The work queue is unbounded: directory workers are both its producers and its only consumers,
/// so a bounded queue could fill while every worker is blocked sending to it. The result channel
/// is bounded; producers race each send against completion and cancellation.
pub struct PipelineChannels<D, F> {
    pub dir_tx: Sender<D>,
    pub dir_rx: Receiver<D>,
    pub file_tx: Sender<F>,
    pub file_rx: Receiver<F>,
}

pub fn create_pipeline_channels<D, F>(file_channel_cap: usize) -> PipelineChannels<D, F> {
    let (dir_tx, dir_rx) = unbounded::<D>();
    let (file_tx, file_rx) = bounded::<F>(file_channel_cap);
    PipelineChannels {
        dir_tx,
        dir_rx,
        file_tx,
        file_rx,
    }
}

/// State every worker of one traversal shares by reference.
pub struct PipelineState<'a> {
    pub ctx: &'a Context,
    pub termination: Termination,
    pub first_error: FirstError,
}

impl<'a> PipelineState<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            termination: Termination::new(),
            first_error: FirstError::new(),
        }
    }

    /// Stop the traversal because a filesystem call failed. A failure caused by our own context's
    /// cancellation ends it as cancelled; anything else is recorded (first wins) as `wrap(source)`.
    pub fn abort(&self, source: BoxError, wrap: impl FnOnce(BoxError) -> SizerError) {
        if self.ctx.is_cancelled() && cancellation_cause(&source).is_some() {
            self.termination.finish(Outcome::Cancelled);
            return;
        }
        self.first_error.record(wrap(source));
        self.termination.finish(Outcome::Failed);
    }

    /// True once the traversal has failed or the context is cancelled; the result no longer
    /// matters past that point.
    pub fn aborted(&self) -> bool {
        self.ctx.is_cancelled() || self.first_error.is_set()
    }
}
