//! Termination detection for a traversal whose size is unknown up front.
//!
//! Every directory handle is counted as discovered before it becomes visible on the work queue,
//! and counted as expanded only after all of its children have been counted and forwarded. A
//! worker that observes `expanded == discovered` right after its own increment therefore knows
//! that no directory is queued or in flight anywhere, so no more work can appear.

use crossbeam_channel::Receiver;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::gate::Gate;

/// Terminal state of one traversal. The first one recorded wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Cancelled,
}

#[derive(Default)]
pub struct Termination {
    discovered: AtomicU64,
    expanded: AtomicU64,
    outcome: OnceLock<Outcome>,
    gate: Gate,
}

impl Termination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `n` directories about to be enqueued. Must precede the enqueue.
    pub fn discover(&self, n: u64) {
        self.discovered.fetch_add(n, Ordering::SeqCst);
    }

    /// Count one fully forwarded directory. Returns true when that was the last outstanding one.
    pub fn expand(&self) -> bool {
        let expanded = self.expanded.fetch_add(1, Ordering::SeqCst) + 1;
        expanded == self.discovered.load(Ordering::SeqCst)
    }

    /// Record `outcome` if none is recorded yet, and broadcast completion either way.
    /// Returns true only for the call whose outcome was recorded.
    pub fn finish(&self, outcome: Outcome) -> bool {
        let recorded = self.outcome.set(outcome).is_ok();
        self.gate.close();
        recorded
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.get().copied()
    }

    pub fn is_finished(&self) -> bool {
        self.gate.is_closed()
    }

    /// Receiver that disconnects once any outcome is recorded.
    pub fn done(&self) -> &Receiver<()> {
        self.gate.closed()
    }

    /// `(discovered, expanded)` snapshot, for logging.
    pub fn counts(&self) -> (u64, u64) {
        (
            self.discovered.load(Ordering::SeqCst),
            self.expanded.load(Ordering::SeqCst),
        )
    }
}

/// Marks the traversal failed if the owning worker unwinds, so its peers are not left waiting on
/// work it will never deliver.
pub struct FinishOnPanic<'a>(pub &'a Termination);

impl Drop for FinishOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.finish(Outcome::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_root_only_completes_on_first_expand() {
        let t = Termination::new();
        t.discover(1);
        assert!(t.expand());
        assert_eq!(t.counts(), (1, 1));
    }

    #[test]
    fn test_children_counted_before_parent_expands() {
        let t = Termination::new();
        t.discover(1);
        t.discover(2);
        assert!(!t.expand());
        assert!(!t.expand());
        assert!(t.expand());
    }

    #[test]
    fn test_first_outcome_wins() {
        let t = Termination::new();
        assert!(!t.is_finished());
        assert!(t.finish(Outcome::Failed));
        assert!(!t.finish(Outcome::Completed));
        assert!(!t.finish(Outcome::Cancelled));
        assert_eq!(t.outcome(), Some(Outcome::Failed));
        assert!(t.is_finished());
        assert!(t.done().recv().is_err());
    }

    #[test]
    fn test_simultaneous_finish_single_record() {
        let t = Termination::new();
        let barrier = Barrier::new(8);
        let recorded = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    if t.finish(Outcome::Completed) {
                        recorded.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(recorded.load(Ordering::SeqCst), 1);
        assert_eq!(t.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_concurrent_expansion_completes_exactly_once() {
        let t = Termination::new();
        t.discover(1);
        t.discover(64);
        assert!(!t.expand());
        let completions = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..8 {
                        if t.expand() {
                            completions.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_guard_finishes_failed() {
        let t = Termination::new();
        let result = thread::scope(|s| {
            s.spawn(|| {
                let _guard = FinishOnPanic(&t);
                panic!("boom");
            })
            .join()
        });
        assert!(result.is_err());
        assert_eq!(t.outcome(), Some(Outcome::Failed));
    }

    #[test]
    fn test_panic_guard_quiet_on_normal_exit() {
        let t = Termination::new();
        {
            let _guard = FinishOnPanic(&t);
        }
        assert!(!t.is_finished());
    }
}
