//! Error definitions shared across library modules.
//! Transient adapter failures never show up here: they are absorbed by the
//! relay's retry policy. What remains are ownership contract violations.
use crate::pool::FrameHandle;
use thiserror_no_std::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// A handle was pushed onto a queue that already holds `capacity` handles.
///
/// The rejected handle travels back inside the error so the buffer is never
/// lost, even on this path.
#[error("Queue full: capacity {capacity}, rejected {handle:?}")]
pub struct QueueFull {
    /// Handle that could not be stored.
    pub handle: FrameHandle,
    /// Capacity of the queue that refused it.
    pub capacity: usize,
}

impl QueueFull {
    /// Take the rejected handle back.
    pub fn into_handle(self) -> FrameHandle {
        self.handle
    }
}

//==================================================================================RELAY_ERROR
#[derive(Error, Debug, PartialEq, Eq)]
/// Errors surfaced by [`Relay::poll`](crate::relay::Relay::poll).
///
/// Pool size and queue capacity share the same const generic, so none of
/// these can occur in a correctly wired firmware. The bootstrap is expected
/// to halt when one does.
pub enum RelayError {
    /// A queue refused a handle.
    #[error(transparent)]
    Queue(#[from] QueueFull),
}
