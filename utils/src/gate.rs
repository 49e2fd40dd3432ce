//! Reentrancy gate shared by the engines.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-entry gate guarding an engine against reentrant calls.
///
/// A mutating operation takes a [`CallPermit`] at its first line and
/// holds it for the call's duration; the permit releases the gate on
/// drop, so every exit path (`?` included, panics included) releases.
/// A second `enter` while a permit is live returns `None` and the
/// caller maps that to its reentrancy error.
///
/// Clones share the same gate, which lets an embedding host (or a
/// test) hold the permit across a compound operation.
#[derive(Clone, Debug, Default)]
pub struct CallGate {
    engaged: Arc<AtomicBool>,
}

impl CallGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to engage the gate. `None` means a call is already in progress.
    pub fn enter(&self) -> Option<CallPermit> {
        if self.engaged.swap(true, Ordering::Acquire) {
            None
        } else {
            Some(CallPermit {
                engaged: Arc::clone(&self.engaged),
            })
        }
    }

    /// Is a permit currently live?
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }
}

/// Live entry token. Dropping it releases the gate.
#[derive(Debug)]
pub struct CallPermit {
    engaged: Arc<AtomicBool>,
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        self.engaged.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_enter_is_refused_while_permit_held() {
        let gate = CallGate::new();
        let permit = gate.enter().expect("gate starts open");
        assert!(gate.enter().is_none());
        drop(permit);
        assert!(gate.enter().is_some());
    }

    #[test]
    fn clones_share_the_same_gate() {
        let gate = CallGate::new();
        let alias = gate.clone();
        let _permit = alias.enter().expect("open");
        assert!(gate.enter().is_none());
        assert!(gate.is_engaged());
    }

    #[test]
    fn early_return_releases_the_gate() {
        fn fallible(gate: &CallGate) -> Result<(), ()> {
            let _permit = gate.enter().ok_or(())?;
            Err(())
        }

        let gate = CallGate::new();
        assert!(fallible(&gate).is_err());
        assert!(!gate.is_engaged());
    }
}
