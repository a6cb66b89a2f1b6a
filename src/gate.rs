//! Close-once broadcast signal.
//!
//! A [`Gate`] owns the only sender of a zero-capacity channel that is never sent on. Closing the
//! gate drops that sender, which disconnects every clone of the receiver at once, so any number of
//! threads parked in `select!` on [`Gate::closed`] wake together. Closing twice is a no-op.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::{Mutex, PoisonError};

pub struct Gate {
    trigger: Mutex<Option<Sender<()>>>,
    closed: Receiver<()>,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    pub fn new() -> Self {
        let (trigger, closed) = bounded(0);
        Self {
            trigger: Mutex::new(Some(trigger)),
            closed,
        }
    }

    /// Close the gate. Returns true only for the call that actually closed it.
    pub fn close(&self) -> bool {
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Receiver that disconnects when the gate closes. Use with `recv` inside `select!`.
    pub fn closed(&self) -> &Receiver<()> {
        &self.closed
    }
}
