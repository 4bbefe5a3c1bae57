//! `gs-can-relay` library: the frame-relay scheduler that moves CAN frames
//! between a CAN controller and a USB host endpoint in a `no_std`,
//! allocation-free control loop. The crate exposes the frame model, the
//! bounded queue and frame pool, the adapter traits, and the relay loop.
#![no_std]
//==================================================================================
/// Tunable constants and the relay configuration value.
pub mod config;
/// Pool and relay errors.
pub mod error;
/// Host-transport representation of one CAN frame, plus codec helpers.
pub mod frame;
/// Fixed arena of frame buffers handed out by move-only handles.
pub mod pool;
/// Bounded FIFO of frame handles.
pub mod queue;
/// The relay loop: host intake, CAN transmit, host transmit pump, CAN receive,
/// error reporting, housekeeping.
pub mod relay;
/// Interfaces to the external collaborators (CAN, USB host link, clock,
/// indicators, bootloader).
pub mod traits;
//==================================================================================
pub use config::{RelayConfig, DEFAULT_POOL_SIZE};
pub use error::{QueueFull, RelayError};
pub use frame::{HostFrame, ECHO_ID_NONE};
pub use pool::{FrameHandle, FramePool};
pub use queue::FrameQueue;
pub use relay::{PollOutcome, Relay, RelayStats};
