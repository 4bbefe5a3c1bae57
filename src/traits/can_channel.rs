//! Minimal non-blocking abstraction over one CAN controller. Implementations
//! wrap the peripheral driver and its own receive FIFO / transmit mailboxes.
use crate::frame::{error_status, HostFrame};

/// Contract to poll, receive, and transmit CAN frames without blocking.
pub trait CanChannel {
    type Error: core::fmt::Debug;

    /// Whether the controller holds at least one received frame.
    fn rx_pending(&mut self) -> bool;

    /// Move the oldest received frame into the CAN fields of `frame`.
    /// An error means nothing was received (e.g. a spurious pending flag).
    fn receive(&mut self, frame: &mut HostFrame) -> Result<(), Self::Error>;

    /// Queue `frame` for transmission. An error means the controller could
    /// not accept it right now (mailboxes full, bus off, ...).
    fn transmit(&mut self, frame: &HostFrame) -> Result<(), Self::Error>;

    /// Raw controller error status register.
    fn error_status(&mut self) -> u32;

    /// Encode `status` as an error frame into `frame`. Returns `false` when the
    /// status has no host representation.
    ///
    /// Defaults to the bxCAN `CAN_ESR` decoding.
    fn parse_error_status(&mut self, status: u32, frame: &mut HostFrame) -> bool {
        error_status::encode_bxcan_error_status(status, frame)
    }
}
