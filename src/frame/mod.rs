//! In-memory representation of one CAN frame as exchanged with the USB host
//! (gs_usb `host_frame` layout), plus SocketCAN identifier constants and
//! conversions to and from [`embedded_can::Frame`].
use embedded_can::{ExtendedId, Frame, Id, StandardId};

pub mod error_status;

//==================================================================================CONSTANTS
/// `echo_id` of a frame that did not originate from a host transmit request.
pub const ECHO_ID_NONE: u32 = 0xFFFF_FFFF;

/// Identifier is 29-bit extended.
pub const CAN_EFF_FLAG: u32 = 0x8000_0000;
/// Remote transmission request.
pub const CAN_RTR_FLAG: u32 = 0x4000_0000;
/// Error frame synthesized by the controller, not a bus frame.
pub const CAN_ERR_FLAG: u32 = 0x2000_0000;
/// Valid bits of a standard identifier.
pub const CAN_SFF_MASK: u32 = 0x0000_07FF;
/// Valid bits of an extended identifier.
pub const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;

/// Payload capacity of a classic CAN frame.
pub const CAN_MAX_DLEN: usize = 8;

//==================================================================================HOST_FRAME
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One CAN frame plus the host-transport metadata.
///
/// The relay only touches `echo_id`, `channel`, `flags`, `reserved` and
/// `timestamp_us`. The CAN fields belong to the adapters.
pub struct HostFrame {
    /// Host-assigned correlation id, or [`ECHO_ID_NONE`].
    pub echo_id: u32,
    /// SocketCAN style identifier including `CAN_*_FLAG` bits.
    pub can_id: u32,
    /// Data length code (0 to 8).
    pub can_dlc: u8,
    /// CAN channel; always 0 on this single-channel device.
    pub channel: u8,
    /// gs_usb frame flags.
    pub flags: u8,
    pub reserved: u8,
    /// Payload buffer. Only the first `can_dlc` bytes are meaningful.
    pub data: [u8; CAN_MAX_DLEN],
    /// Capture or send time in microseconds.
    pub timestamp_us: u32,
}

impl Default for HostFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFrame {
    /// Zeroed frame.
    pub const fn new() -> Self {
        Self {
            echo_id: 0,
            can_id: 0,
            can_dlc: 0,
            channel: 0,
            flags: 0,
            reserved: 0,
            data: [0; CAN_MAX_DLEN],
            timestamp_us: 0,
        }
    }

    /// Whether this frame acknowledges a host transmit request.
    #[inline]
    pub fn is_echo(&self) -> bool {
        self.echo_id != ECHO_ID_NONE
    }

    /// Whether this frame reports a controller error rather than bus traffic.
    #[inline]
    pub fn is_error_frame(&self) -> bool {
        self.can_id & CAN_ERR_FLAG != 0
    }

    /// Stamp the metadata of a frame originated on this device (bus receive
    /// or error report): not an echo, channel 0, no flags.
    pub fn stamp_local(&mut self, timestamp_us: u32) {
        self.timestamp_us = timestamp_us;
        self.echo_id = ECHO_ID_NONE;
        self.channel = 0;
        self.flags = 0;
        self.reserved = 0;
    }

    /// Populated payload bytes, clamped to the buffer.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let len = (self.can_dlc as usize).min(CAN_MAX_DLEN);
        &self.data[..len]
    }

    /// Overwrite the CAN fields with those of `frame`, leaving the metadata
    /// untouched.
    pub fn set_can_frame<F: Frame>(&mut self, frame: &F) {
        let mut can_id = match frame.id() {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw() | CAN_EFF_FLAG,
        };
        if frame.is_remote_frame() {
            can_id |= CAN_RTR_FLAG;
        }
        self.can_id = can_id;

        let dlc = frame.dlc().min(CAN_MAX_DLEN);
        self.can_dlc = dlc as u8;
        self.data = [0; CAN_MAX_DLEN];
        let data = frame.data();
        let copy_len = data.len().min(CAN_MAX_DLEN);
        self.data[..copy_len].copy_from_slice(&data[..copy_len]);
    }

    /// Build a fresh host frame from a bus frame. Metadata is zeroed.
    pub fn from_can_frame<F: Frame>(frame: &F) -> Self {
        let mut host_frame = Self::new();
        host_frame.set_can_frame(frame);
        host_frame
    }

    /// Identifier as an [`embedded_can::Id`]. `None` for error frames or
    /// out-of-range values.
    pub fn id(&self) -> Option<Id> {
        if self.is_error_frame() {
            return None;
        }
        if self.can_id & CAN_EFF_FLAG != 0 {
            ExtendedId::new(self.can_id & CAN_EFF_MASK).map(Id::Extended)
        } else {
            StandardId::new((self.can_id & CAN_SFF_MASK) as u16).map(Id::Standard)
        }
    }

    /// Convert into a bus frame for a driver. Error frames cannot be
    /// transmitted and yield `None`, as does a DLC above 8.
    pub fn to_can_frame<F: Frame>(&self) -> Option<F> {
        let id = self.id()?;
        let dlc = self.can_dlc as usize;
        if dlc > CAN_MAX_DLEN {
            return None;
        }
        if self.can_id & CAN_RTR_FLAG != 0 {
            F::new_remote(id, dlc)
        } else {
            F::new(id, &self.data[..dlc])
        }
    }
}
