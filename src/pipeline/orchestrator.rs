use crossbeam_channel::select;
use log::debug;
use std::thread;
use std::time::Instant;

use super::context::{PipelineChannels, PipelineState, create_pipeline_channels};
use super::metadata::file_aggregator_loop;
use super::termination::{Outcome, Termination};
use super::walk::DirWorker;
use crate::context::Context;
use crate::error::SizerError;
use crate::fs::FileSystem;
use crate::{SizeResult, SizerOpts};

/// Computes the total size and file count of a directory tree with a bounded worker pool.
///
/// A `Sizer` holds no per-traversal state, so one instance can serve any number of
/// (including concurrent) [`size`](Sizer::size) calls.
pub struct Sizer<F: FileSystem> {
    fs: F,
    opts: SizerOpts,
}

impl<F: FileSystem> Sizer<F> {
    pub fn new(fs: F, opts: SizerOpts) -> Self {
        Self { fs, opts }
    }

    pub fn with_defaults(fs: F) -> Self {
        Self::new(fs, SizerOpts::default())
    }

    pub fn opts(&self) -> &SizerOpts {
        &self.opts
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Size the tree under `root`.
    ///
    /// Fails with the first listing or stat error any worker hits, or with the context's cause if
    /// `ctx` is cancelled before the traversal completes. On failure no partial total is returned.
    /// Every worker has exited by the time this returns, whatever the outcome.
    pub fn size(&self, ctx: &Context, root: F::Dir) -> Result<SizeResult, SizerError> {
        let start = Instant::now();
        let workers = self.opts.effective_workers();
        let PipelineChannels {
            dir_tx,
            dir_rx,
            file_tx,
            file_rx,
        } = create_pipeline_channels::<F::Dir, F::File>(self.opts.file_channel_cap);
        let state = PipelineState::new(ctx);
        debug!("sizing {:?} with {} directory workers", root, workers);

        let (totals, panicked) = thread::scope(|s| {
            let dir_handles: Vec<_> = (0..workers)
                .map(|id| {
                    let worker = DirWorker {
                        id,
                        fs: &self.fs,
                        state: &state,
                        dir_tx: dir_tx.clone(),
                        dir_rx: dir_rx.clone(),
                        file_tx: file_tx.clone(),
                    };
                    s.spawn(move || worker.run())
                })
                .collect();
            // Only workers hold these now: the result channel disconnects once they all exit.
            drop(file_tx);
            drop(dir_rx);

            let state_ref = &state;
            let fs = &self.fs;
            let aggregator = s.spawn(move || file_aggregator_loop(fs, state_ref, file_rx));

            state.termination.discover(1);
            if dir_tx.send(root).is_err() {
                // Every worker is already gone; nothing would ever finish the traversal.
                state.termination.finish(Outcome::Failed);
            }
            drop(dir_tx);

            let supervisor = s.spawn(|| supervise(ctx, &state.termination));

            let mut panicked = None;
            let mut expanded = 0_u64;
            for handle in dir_handles {
                match handle.join() {
                    Ok(n) => expanded += n,
                    Err(_) => {
                        panicked.get_or_insert("directory worker");
                    }
                }
            }
            let totals = aggregator.join().unwrap_or_else(|_| {
                panicked.get_or_insert("file aggregator");
                SizeResult::default()
            });
            if supervisor.join().is_err() {
                panicked.get_or_insert("supervisor");
            }
            debug!("workers joined: {} dirs expanded", expanded);
            (totals, panicked)
        });

        debug!(
            "sizing finished as {:?} in {:?}",
            state.termination.outcome(),
            start.elapsed()
        );
        if let Some(who) = panicked {
            return Err(SizerError::WorkerPanicked(who));
        }
        if let Some(err) = state.first_error.take() {
            return Err(err);
        }
        if let Some(cause) = ctx.err() {
            return Err(cause.into());
        }
        Ok(totals)
    }
}

/// Turn context cancellation into a traversal outcome; exit once the traversal finishes otherwise.
fn supervise(ctx: &Context, termination: &Termination) {
    select! {
        recv(ctx.done()) -> _ => {
            if termination.finish(Outcome::Cancelled) {
                debug!("traversal cancelled: {:?}", ctx.err());
            }
        },
        recv(termination.done()) -> _ => {},
    }
}
