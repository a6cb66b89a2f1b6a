//! Directory workers: expand directories, feed subdirectories back to the work queue and files to
//! the result channel.

use crossbeam_channel::{Receiver, Sender, select};
use log::{debug, trace};

use super::context::PipelineState;
use super::termination::{FinishOnPanic, Outcome};
use crate::error::SizerError;
use crate::fs::{FileSystem, Listing};

pub struct DirWorker<'a, F: FileSystem> {
    pub id: usize,
    pub fs: &'a F,
    pub state: &'a PipelineState<'a>,
    pub dir_tx: Sender<F::Dir>,
    pub dir_rx: Receiver<F::Dir>,
    pub file_tx: Sender<F::File>,
}

impl<F: FileSystem> DirWorker<'_, F> {
    /// Take directories until the queue disconnects, the traversal finishes, or the context is
    /// cancelled. Returns how many directories this worker expanded.
    pub fn run(self) -> u64 {
        let _guard = FinishOnPanic(&self.state.termination);
        let mut expanded = 0_u64;
        loop {
            let dir = select! {
                recv(self.dir_rx) -> msg => match msg {
                    Ok(dir) => dir,
                    Err(_) => break,
                },
                recv(self.state.termination.done()) -> _ => break,
                recv(self.state.ctx.done()) -> _ => break,
            };
            if !self.expand(dir) {
                break;
            }
            expanded += 1;
        }
        trace!("dir worker {}: exiting after {} dirs", self.id, expanded);
        expanded
    }

    /// List one directory and forward its children. Returns false when the worker should stop.
    fn expand(&self, dir: F::Dir) -> bool {
        let state = self.state;
        let Listing { dirs, files } = match self.fs.list_children(state.ctx, &dir) {
            Ok(listing) => listing,
            Err(source) => {
                state.abort(source, |source| SizerError::listing(&dir, source));
                return false;
            }
        };
        trace!(
            "dir worker {}: {:?} has {} dirs, {} files",
            self.id,
            dir,
            dirs.len(),
            files.len()
        );

        // Count children before any of them can be picked up, so no peer can see the counters
        // meet while this directory is still being forwarded.
        state.termination.discover(dirs.len() as u64);
        for child in dirs {
            // Unbounded and this worker holds a receiver, so the send cannot block or fail.
            if self.dir_tx.send(child).is_err() {
                return false;
            }
        }

        for file in files {
            select! {
                send(self.file_tx, file) -> res => {
                    if res.is_err() {
                        return false;
                    }
                },
                recv(state.termination.done()) -> _ => return false,
                recv(state.ctx.done()) -> _ => return false,
            }
        }

        if state.termination.expand() {
            let (discovered, expanded) = state.termination.counts();
            debug!(
                "dir worker {}: traversal complete ({} discovered, {} expanded)",
                self.id, discovered, expanded
            );
            state.termination.finish(Outcome::Completed);
        }
        true
    }
}
