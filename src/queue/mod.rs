//! Bounded FIFO of frame handles.
//!
//! Used both as the pool's free list and as the two transfer queues. The
//! queue never allocates after construction and never blocks: popping an
//! empty queue yields `None`, pushing a full one hands the handle back.
use heapless::Deque;

use crate::error::QueueFull;
use crate::pool::FrameHandle;

/// Fixed-capacity queue of `N` frame handles.
pub struct FrameQueue<const N: usize> {
    handles: Deque<FrameHandle, N>,
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameQueue<N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            handles: Deque::new(),
        }
    }

    /// Dequeue the oldest handle.
    #[inline]
    pub fn pop_front(&mut self) -> Option<FrameHandle> {
        self.handles.pop_front()
    }

    /// Enqueue behind every handle already queued.
    pub fn push_back(&mut self, handle: FrameHandle) -> Result<(), QueueFull> {
        self.handles
            .push_back(handle)
            .map_err(|handle| QueueFull {
                handle,
                capacity: N,
            })
    }

    /// Re-insert at the head, as if the handle had never been popped.
    ///
    /// Only meant for retrying an operation on a later pass: relative order
    /// among the remaining handles is preserved.
    pub fn push_front(&mut self, handle: FrameHandle) -> Result<(), QueueFull> {
        self.handles
            .push_front(handle)
            .map_err(|handle| QueueFull {
                handle,
                capacity: N,
            })
    }

    /// Handle that the next `pop_front` would return.
    #[inline]
    pub fn front(&self) -> Option<&FrameHandle> {
        self.handles.front()
    }

    /// Handles from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &FrameHandle> {
        self.handles.iter()
    }

    /// Number of queued handles.
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handle is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether a push would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.handles.is_full()
    }

    /// Maximum number of handles, `N`.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}
