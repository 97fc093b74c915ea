//! # Run state and reentrancy guard.
//!
//! The [`Gate`] decides whether `publish` may dispatch or must buffer. It combines:
//! - the **external pause** toggled by `Emitter::pause` / `Emitter::resume`;
//! - the **guard count**: dispatch units currently inside their guard window
//!   (listener invocation plus, for serialized delivery, the settle-or-timeout race).
//!
//! ```text
//! paused=false guards=0  → Started (dispatch)
//! paused=true            → Stopped (buffer)
//! guards>0               → Stopped (buffer)
//! ```
//!
//! The guard is coarse: one held window on any channel buffers publishes on
//! every channel. A counter lets windows on different channels overlap without
//! tripping the pause/resume misuse checks.

use crate::error::EmitterError;

/// Observable run state of an emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Publishes dispatch to listeners.
    Started,
    /// Publishes are buffered.
    Stopped,
}

#[derive(Debug, Default)]
pub(super) struct Gate {
    paused: bool,
    guards: usize,
}

impl Gate {
    #[inline]
    pub(super) fn is_open(&self) -> bool {
        !self.paused && self.guards == 0
    }

    #[inline]
    pub(super) fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true while any guard window is held.
    #[inline]
    pub(super) fn is_guarded(&self) -> bool {
        self.guards > 0
    }

    pub(super) fn state(&self) -> RunState {
        if self.is_open() {
            RunState::Started
        } else {
            RunState::Stopped
        }
    }

    pub(super) fn pause(&mut self) -> Result<(), EmitterError> {
        if self.paused {
            return Err(EmitterError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    pub(super) fn resume(&mut self) -> Result<(), EmitterError> {
        if !self.paused {
            return Err(EmitterError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Opens a guard window.
    pub(super) fn enter(&mut self) {
        self.guards += 1;
    }

    /// Closes a guard window. Returns true if the gate is now open.
    pub(super) fn leave(&mut self) -> bool {
        self.guards = self.guards.saturating_sub(1);
        self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_open() {
        let gate = Gate::default();
        assert!(gate.is_open());
        assert_eq!(gate.state(), RunState::Started);
    }

    #[test]
    fn test_pause_twice_is_misuse() {
        let mut gate = Gate::default();
        assert!(gate.pause().is_ok());
        assert_eq!(gate.pause(), Err(EmitterError::AlreadyPaused));
        assert_eq!(gate.state(), RunState::Stopped);
    }

    #[test]
    fn test_resume_without_pause_is_misuse() {
        let mut gate = Gate::default();
        assert_eq!(gate.resume(), Err(EmitterError::NotPaused));
        assert!(gate.is_open());
    }

    #[test]
    fn test_overlapping_guards_reopen_once() {
        let mut gate = Gate::default();
        gate.enter();
        gate.enter();
        assert_eq!(gate.state(), RunState::Stopped);
        assert!(!gate.leave());
        assert!(gate.is_guarded());
        assert!(gate.leave());
        assert!(!gate.is_guarded());
    }

    #[test]
    fn test_guard_release_keeps_external_pause() {
        let mut gate = Gate::default();
        gate.enter();
        assert!(gate.pause().is_ok());
        assert!(!gate.leave());
        assert!(gate.is_paused());
        assert!(gate.resume().is_ok());
        assert!(gate.is_open());
    }
}
