use log::{debug, trace};
use std::sync::{Mutex, PoisonError};

use crate::error::SizerError;

/// First-error-wins slot shared by every worker of one traversal.
#[derive(Default)]
pub struct FirstError {
    slot: Mutex<Option<SizerError>>,
}

impl FirstError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `err` unless an error is already stored. Returns true when `err` was kept.
    pub fn record(&self, err: SizerError) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            trace!("discarding later error: {}", err);
            return false;
        }
        debug!("first error: {}", err);
        *slot = Some(err);
        true
    }

    pub fn is_set(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn take(&self) -> Option<SizerError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let slot = FirstError::new();
        assert!(!slot.is_set());
        assert!(slot.record(SizerError::listing(&"a", "first".into())));
        assert!(!slot.record(SizerError::stat(&"b", "second".into())));
        assert!(slot.is_set());
        match slot.take() {
            Some(SizerError::Listing { dir, .. }) => assert_eq!(dir, "\"a\""),
            other => panic!("unexpected {:?}", other),
        }
        assert!(slot.take().is_none());
    }
}
