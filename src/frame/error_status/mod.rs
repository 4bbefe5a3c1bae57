//! Decoding of a bxCAN error status register (`CAN_ESR`) into a SocketCAN
//! error frame the host understands.
//!
//! Register layout:
//!
//! ```text
//!  31      24 23      16 15     7 6   4 3  2    1    0
//! ┌──────────┬──────────┬────────┬─────┬──┬────┬────┬────┐
//! │   REC    │   TEC    │  ----  │ LEC │- │BOFF│EPVF│EWGF│
//! └──────────┴──────────┴────────┴─────┴──┴────┴────┴────┘
//! ```
use super::{HostFrame, CAN_ERR_FLAG, CAN_MAX_DLEN};

//==================================================================================SOCKETCAN_ERROR_CLASSES
/// Controller problems, details in `data[1]`.
pub const CAN_ERR_CRTL: u32 = 0x0000_0004;
/// Protocol violations, details in `data[2]` and `data[3]`.
pub const CAN_ERR_PROT: u32 = 0x0000_0008;
/// No acknowledgement on transmission.
pub const CAN_ERR_ACK: u32 = 0x0000_0020;
/// Controller went bus-off.
pub const CAN_ERR_BUSOFF: u32 = 0x0000_0040;
/// Error frames always carry eight bytes.
pub const CAN_ERR_DLC: u8 = 8;

/// `data[1]` bits.
pub const CAN_ERR_CRTL_RX_WARNING: u8 = 0x04;
pub const CAN_ERR_CRTL_TX_WARNING: u8 = 0x08;
pub const CAN_ERR_CRTL_RX_PASSIVE: u8 = 0x10;
pub const CAN_ERR_CRTL_TX_PASSIVE: u8 = 0x20;

/// `data[2]` bits.
pub const CAN_ERR_PROT_FORM: u8 = 0x02;
pub const CAN_ERR_PROT_STUFF: u8 = 0x04;
pub const CAN_ERR_PROT_BIT0: u8 = 0x08;
pub const CAN_ERR_PROT_BIT1: u8 = 0x10;

/// `data[3]` value: error in the CRC sequence.
pub const CAN_ERR_PROT_LOC_CRC_SEQ: u8 = 0x08;

//==================================================================================BXCAN_ESR
const ESR_EWGF: u32 = 1 << 0;
const ESR_EPVF: u32 = 1 << 1;
const ESR_BOFF: u32 = 1 << 2;

/// Counter value at which the controller raises EWGF.
const ERROR_WARNING_LIMIT: u8 = 96;
/// Counters above this value put the controller in error passive.
const ERROR_PASSIVE_LIMIT: u8 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Last error code (LEC) field of the ESR.
pub enum LastErrorCode {
    NoError,
    Stuff,
    Form,
    Acknowledgment,
    BitRecessive,
    BitDominant,
    Crc,
    /// Value written by software to detect LEC updates.
    SetBySoftware,
}

impl LastErrorCode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::NoError,
            1 => Self::Stuff,
            2 => Self::Form,
            3 => Self::Acknowledgment,
            4 => Self::BitRecessive,
            5 => Self::BitDominant,
            6 => Self::Crc,
            _ => Self::SetBySoftware,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Typed view over a raw `CAN_ESR` value.
pub struct BxcanErrorStatus(pub u32);

impl BxcanErrorStatus {
    /// Error warning flag (a counter reached 96).
    pub fn error_warning(&self) -> bool {
        self.0 & ESR_EWGF != 0
    }

    /// Error passive flag (a counter exceeded 127).
    pub fn error_passive(&self) -> bool {
        self.0 & ESR_EPVF != 0
    }

    pub fn bus_off(&self) -> bool {
        self.0 & ESR_BOFF != 0
    }

    pub fn last_error_code(&self) -> LastErrorCode {
        LastErrorCode::from_bits(((self.0 >> 4) & 0x07) as u8)
    }

    /// Transmit error counter.
    pub fn tec(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Receive error counter.
    pub fn rec(&self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Fill the CAN fields of `frame` with the matching error frame, TEC and
    /// REC in `data[6]` and `data[7]`.
    /// Metadata (`echo_id`, timestamp, channel) is left to the caller.
    pub fn write_error_frame(&self, frame: &mut HostFrame) {
        let mut can_id = CAN_ERR_FLAG | CAN_ERR_CRTL;
        let mut data = [0u8; CAN_MAX_DLEN];

        if self.bus_off() {
            can_id |= CAN_ERR_BUSOFF;
        }

        let (tec, rec) = (self.tec(), self.rec());

        // Passive supersedes warning. The counters tell which side crossed.
        if self.error_passive() {
            if tec > ERROR_PASSIVE_LIMIT {
                data[1] |= CAN_ERR_CRTL_TX_PASSIVE;
            }
            if rec > ERROR_PASSIVE_LIMIT {
                data[1] |= CAN_ERR_CRTL_RX_PASSIVE;
            }
        } else if self.error_warning() {
            if tec >= ERROR_WARNING_LIMIT {
                data[1] |= CAN_ERR_CRTL_TX_WARNING;
            }
            if rec >= ERROR_WARNING_LIMIT {
                data[1] |= CAN_ERR_CRTL_RX_WARNING;
            }
        }

        data[6] = tec;
        data[7] = rec;

        match self.last_error_code() {
            LastErrorCode::Stuff => {
                can_id |= CAN_ERR_PROT;
                data[2] |= CAN_ERR_PROT_STUFF;
            }
            LastErrorCode::Form => {
                can_id |= CAN_ERR_PROT;
                data[2] |= CAN_ERR_PROT_FORM;
            }
            LastErrorCode::Acknowledgment => can_id |= CAN_ERR_ACK,
            LastErrorCode::BitRecessive => {
                can_id |= CAN_ERR_PROT;
                data[2] |= CAN_ERR_PROT_BIT1;
            }
            LastErrorCode::BitDominant => {
                can_id |= CAN_ERR_PROT;
                data[2] |= CAN_ERR_PROT_BIT0;
            }
            LastErrorCode::Crc => {
                can_id |= CAN_ERR_PROT;
                data[3] = CAN_ERR_PROT_LOC_CRC_SEQ;
            }
            LastErrorCode::NoError | LastErrorCode::SetBySoftware => {}
        }

        frame.can_id = can_id;
        frame.can_dlc = CAN_ERR_DLC;
        frame.data = data;
    }
}

/// Encode a raw bxCAN error status into `frame`.
///
/// Every status value has an error-frame form, so this always succeeds; it
/// returns `bool` to match [`CanChannel::parse_error_status`].
///
/// [`CanChannel::parse_error_status`]: crate::traits::can_channel::CanChannel::parse_error_status
pub fn encode_bxcan_error_status(status: u32, frame: &mut HostFrame) -> bool {
    BxcanErrorStatus(status).write_error_frame(frame);
    true
}
