//! Fixed arena of frame buffers.
//!
//! All `N` buffers exist from construction; they are never freed and never
//! allocated again. Ownership circulates as [`FrameHandle`] tokens, which are
//! move-only, so a buffer cannot be referenced from two queues at once.
use crate::error::QueueFull;
use crate::frame::HostFrame;
use crate::queue::FrameQueue;

//==================================================================================FRAME_HANDLE
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Exclusive claim on one pool slot.
///
/// Deliberately neither `Clone` nor `Copy`: whoever holds the handle owns the
/// buffer, and giving it to a queue gives the buffer away.
pub struct FrameHandle(u8);

impl FrameHandle {
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Slot index inside the pool arena.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

//==================================================================================FRAME_POOL
/// Arena of `N` host frames plus the free list of their handles.
pub struct FramePool<const N: usize> {
    slots: [HostFrame; N],
    free: FrameQueue<N>,
}

impl<const N: usize> Default for FramePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FramePool<N> {
    const SIZE_CHECK: () = assert!(
        N > 0 && N <= u8::MAX as usize + 1,
        "pool size must be within 1..=256"
    );

    /// Allocate the `N` buffers and seed the free list with every handle.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SIZE_CHECK;

        let mut free = FrameQueue::new();
        for index in 0..N {
            // Capacity equals N, so seeding cannot overflow.
            let _ = free.push_back(FrameHandle::new(index as u8));
        }

        Self {
            slots: [HostFrame::new(); N],
            free,
        }
    }

    /// Take a free buffer. `None` when every buffer is in use.
    #[inline]
    pub fn acquire(&mut self) -> Option<FrameHandle> {
        self.free.pop_front()
    }

    /// Return a buffer to the free list.
    #[inline]
    pub fn release(&mut self, handle: FrameHandle) -> Result<(), QueueFull> {
        self.free.push_back(handle)
    }

    /// Buffer owned by `handle`.
    #[inline]
    pub fn frame(&self, handle: &FrameHandle) -> &HostFrame {
        &self.slots[handle.index()]
    }

    /// Mutable buffer owned by `handle`.
    #[inline]
    pub fn frame_mut(&mut self, handle: &FrameHandle) -> &mut HostFrame {
        &mut self.slots[handle.index()]
    }

    /// Number of buffers currently free.
    #[inline]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Total number of buffers.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Free handles, next to be acquired first.
    pub fn free_handles(&self) -> impl Iterator<Item = &FrameHandle> {
        self.free.iter()
    }
}
