//! Cancellation context shared by the sizer and the filesystem it reads.
//!
//! A [`Context`] is a cheap cloneable handle. Every clone observes the same cancellation, and
//! [`Context::done`] exposes it as a receiver so blocking channel operations can race against it
//! in `crossbeam_channel::select!`. Derived contexts ([`Context::child`],
//! [`Context::with_timeout`]) are cancelled when their parent is, or when their own deadline
//! passes; a small watcher thread forwards the parent's cause and exits as soon as the child is
//! cancelled or dropped.

use crossbeam_channel::{Receiver, at, never, select};
use log::trace;
use std::sync::{Arc, OnceLock, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crate::gate::Gate;

/// Why a [`Context`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Cancelled {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    cause: OnceLock<Cancelled>,
    gate: Gate,
    deadline: Option<Instant>,
    /// False only for [`Context::background`].
    cancellable: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cause", &self.err())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}

impl Context {
    fn with_inner(deadline: Option<Instant>, cancellable: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                cause: OnceLock::new(),
                gate: Gate::new(),
                deadline,
                cancellable,
            }),
        }
    }

    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::with_inner(None, false)
    }

    /// A root context cancelled only by [`Context::cancel`].
    pub fn new() -> Self {
        Self::with_inner(None, true)
    }

    /// Cancelled by its own [`Context::cancel`] or when `parent` is cancelled.
    pub fn child(parent: &Context) -> Self {
        Self::derive(parent, None)
    }

    /// Like [`Context::child`], and additionally cancelled with
    /// [`Cancelled::DeadlineExceeded`] once `timeout` has elapsed.
    pub fn with_timeout(parent: &Context, timeout: Duration) -> Self {
        Self::with_deadline(parent, Instant::now() + timeout)
    }

    pub fn with_deadline(parent: &Context, deadline: Instant) -> Self {
        Self::derive(parent, Some(deadline))
    }

    fn derive(parent: &Context, deadline: Option<Instant>) -> Self {
        let effective = match (parent.inner.deadline, deadline) {
            (Some(p), Some(d)) => Some(p.min(d)),
            (p, d) => p.or(d),
        };
        let child = Self::with_inner(effective, true);
        if let Some(cause) = parent.err() {
            child.cancel_with(cause);
            return child;
        }
        if !parent.inner.cancellable && deadline.is_none() {
            return child;
        }

        let parent = Arc::clone(&parent.inner);
        let own_done = child.inner.gate.closed().clone();
        let weak: Weak<Inner> = Arc::downgrade(&child.inner);
        thread::spawn(move || {
            let timer = deadline.map(at).unwrap_or_else(never);
            let cause = select! {
                recv(parent.gate.closed()) -> _ => {
                    parent.cause.get().copied().unwrap_or(Cancelled::Canceled)
                },
                recv(timer) -> _ => Cancelled::DeadlineExceeded,
                recv(own_done) -> _ => return,
            };
            if let Some(inner) = weak.upgrade() {
                cancel_inner(&inner, cause);
            }
        });
        child
    }

    /// Cancel with [`Cancelled::Canceled`]. No effect on [`Context::background`] or on an
    /// already-cancelled context.
    pub fn cancel(&self) {
        self.cancel_with(Cancelled::Canceled);
    }

    fn cancel_with(&self, cause: Cancelled) {
        if self.inner.cancellable {
            cancel_inner(&self.inner, cause);
        }
    }

    /// Receiver that disconnects when this context is cancelled.
    pub fn done(&self) -> &Receiver<()> {
        self.inner.gate.closed()
    }

    pub fn err(&self) -> Option<Cancelled> {
        self.inner.cause.get().copied()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cause.get().is_some()
    }

    /// `Err(cause)` once cancelled. Filesystem implementations call this before doing work.
    pub fn check(&self) -> Result<(), Cancelled> {
        match self.err() {
            Some(cause) => Err(cause),
            None => Ok(()),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Sleep for `dur`, waking early with the cause if the context is cancelled meanwhile.
    pub fn sleep(&self, dur: Duration) -> Result<(), Cancelled> {
        select! {
            recv(self.done()) -> _ => self.check(),
            default(dur) => self.check(),
        }
    }
}

fn cancel_inner(inner: &Inner, cause: Cancelled) {
    // Cause first, so anyone woken by the gate sees it.
    if inner.cause.set(cause).is_ok() {
        trace!("context cancelled: {}", cause);
    }
    inner.gate.close();
}
