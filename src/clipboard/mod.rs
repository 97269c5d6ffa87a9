//! Clipboard bridge: text codec, paste engine and the in-flight guard.
//!
//! The system clipboard is asynchronous. The grid hands the host a pending
//! operation, the host performs the I/O and reports back. Only one operation
//! may be in flight at a time.

pub mod codec;
pub mod paste;

pub use codec::{escape_field, matrix_to_text, text_to_matrix, TAB};
pub use paste::{is_selection_read_only, paste, paste_precondition, PasteOutcome};

use crate::error::{GridError, Result};

/// A clipboard operation awaiting its completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    /// Write; `cut` deletes the selection once the write succeeded.
    Copy { cut: bool },
    Read,
}

#[derive(Debug, Default)]
pub struct ClipboardGate {
    pending: Option<ClipboardOp>,
}

impl ClipboardGate {
    pub fn begin(&mut self, op: ClipboardOp) -> Result<()> {
        if self.pending.is_some() {
            return Err(GridError::ClipboardBusy);
        }
        self.pending = Some(op);
        Ok(())
    }

    /// Close the pending operation, returning it. Completion callbacks that
    /// do not match the pending kind are rejected.
    pub fn finish(&mut self, expect_read: bool) -> Result<ClipboardOp> {
        match self.pending {
            Some(op @ ClipboardOp::Read) if expect_read => {
                self.pending = None;
                Ok(op)
            }
            Some(op @ ClipboardOp::Copy { .. }) if !expect_read => {
                self.pending = None;
                Ok(op)
            }
            _ => Err(GridError::Clipboard(
                "no matching clipboard operation pending".into(),
            )),
        }
    }

    pub fn pending(&self) -> Option<ClipboardOp> {
        self.pending
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn second_operation_is_busy() {
        let mut gate = ClipboardGate::default();
        gate.begin(ClipboardOp::Read).unwrap();
        assert!(matches!(
            gate.begin(ClipboardOp::Copy { cut: false }),
            Err(GridError::ClipboardBusy)
        ));
        assert_eq!(gate.finish(true).unwrap(), ClipboardOp::Read);
        gate.begin(ClipboardOp::Copy { cut: true }).unwrap();
    }

    #[test]
    fn mismatched_completion_is_rejected() {
        let mut gate = ClipboardGate::default();
        assert!(gate.finish(false).is_err());
        gate.begin(ClipboardOp::Copy { cut: false }).unwrap();
        assert!(gate.finish(true).is_err());
        assert_eq!(gate.pending(), Some(ClipboardOp::Copy { cut: false }));
        assert!(gate.finish(false).is_ok());
    }
}
