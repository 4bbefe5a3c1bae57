//! Relay configuration: pool sizing, heartbeat timing, and the protocol
//! version at which host delivery switches to queue-backed flow control.

/// Number of frame buffers in the reference configuration.
///
/// The same value sizes the free pool and both transfer queues, so a queue
/// can always hold every buffer in the system at once.
///
/// # Sizing
///
/// - **4**: a full-speed gs_usb device keeps up with a saturated 1 Mbit/s bus
///   when the host polls the IN endpoint every frame.
/// - Larger pools only help when the host stalls for longer bursts; every
///   slot costs one [`HostFrame`](crate::frame::HostFrame) of RAM.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Heartbeat indicator toggle period (µs).
///
/// Purely cosmetic: a blinking heartbeat shows the main loop is still being
/// serviced.
pub const HEARTBEAT_PERIOD_US: u32 = 500_000;

/// First host protocol version that expects queued delivery.
///
/// Hosts negotiating this version or newer accept frames only through the
/// transmit pump; older hosts get an immediate send attempt first.
pub const QUEUED_DELIVERY_PROTOCOL_VERSION: u8 = 2;

//==================================================================================RELAY_CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Runtime knobs of the [`Relay`](crate::relay::Relay).
pub struct RelayConfig {
    /// Heartbeat toggle period in microseconds.
    pub heartbeat_period_us: u32,
    /// Protocol versions at or above this value enqueue every host frame.
    pub queued_delivery_version: u8,
    /// Error status assumed before the first read. A different first read is
    /// reported as an edge.
    pub initial_error_status: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayConfig {
    /// Reference configuration.
    pub const fn new() -> Self {
        Self {
            heartbeat_period_us: HEARTBEAT_PERIOD_US,
            queued_delivery_version: QUEUED_DELIVERY_PROTOCOL_VERSION,
            initial_error_status: 0,
        }
    }

    /// Override the heartbeat period. Zero toggles on every pass.
    pub const fn with_heartbeat_period_us(mut self, period_us: u32) -> Self {
        self.heartbeat_period_us = period_us;
        self
    }

    /// Override the queued-delivery threshold.
    pub const fn with_queued_delivery_version(mut self, version: u8) -> Self {
        self.queued_delivery_version = version;
        self
    }

    /// Override the error status considered already reported at start-up.
    pub const fn with_initial_error_status(mut self, status: u32) -> Self {
        self.initial_error_status = status;
        self
    }

    /// Whether a host speaking `version` gets queue-backed delivery.
    #[inline]
    pub const fn uses_queued_delivery(&self, version: u8) -> bool {
        version >= self.queued_delivery_version
    }
}
