use crossbeam_channel::{Receiver, select};
use log::trace;

use super::context::PipelineState;
use super::termination::FinishOnPanic;
use crate::SizeResult;
use crate::error::SizerError;
use crate::fs::FileSystem;

/// Single file aggregator: stat each file from `file_rx` and fold it into the totals.
///
/// Runs until every directory worker has dropped its sender, so files still buffered when the
/// last directory is expanded are counted. Stops early on cancellation or once any worker has
/// recorded an error; dropping `file_rx` then fails any send still pending in a directory worker.
pub fn file_aggregator_loop<F: FileSystem>(
    fs: &F,
    state: &PipelineState<'_>,
    file_rx: Receiver<F::File>,
) -> SizeResult {
    let _guard = FinishOnPanic(&state.termination);
    let mut totals = SizeResult::default();
    loop {
        let file = select! {
            recv(file_rx) -> msg => match msg {
                Ok(file) => file,
                Err(_) => break,
            },
            recv(state.ctx.done()) -> _ => break,
        };
        if state.aborted() {
            break;
        }
        match fs.stat_size(state.ctx, &file) {
            Ok(size) => totals.add(size),
            Err(source) => {
                state.abort(source, |source| SizerError::stat(&file, source));
                break;
            }
        }
    }
    trace!(
        "file aggregator: exiting after {} files, {} bytes",
        totals.count, totals.size
    );
    totals
}
