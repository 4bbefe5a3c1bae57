//! Hand-off to the firmware-update bootloader.

/// Entry into the device's bootloader (e.g. DFU after a host detach request).
pub trait Bootloader {
    /// Leave the application for good.
    fn enter(&mut self) -> !;
}
