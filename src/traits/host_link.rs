//! Abstraction over the USB device class endpoint talking to the host driver.
//! The USB stack callbacks live behind this trait; the relay only polls it.
use crate::frame::HostFrame;

/// Contract to exchange host frames with the USB host.
pub trait HostLink {
    type Error: core::fmt::Debug;

    /// Whether the IN endpoint can take a frame now.
    fn tx_ready(&mut self) -> bool;

    /// Send `frame` to the host. An error means it was not taken and must be
    /// retried later.
    fn transmit(&mut self, frame: &HostFrame) -> Result<(), Self::Error>;

    /// Whether the host sent a frame that waits for a pool buffer.
    fn rx_pending(&mut self) -> bool;

    /// Move the oldest frame sent by the host into `frame`, including the
    /// host-assigned `echo_id`.
    fn receive(&mut self, frame: &mut HostFrame) -> Result<(), Self::Error>;

    /// Protocol version negotiated with the host driver.
    fn protocol_version(&self) -> u8;

    /// Whether the host asked the device to detach into its bootloader.
    fn detach_requested(&self) -> bool;
}
