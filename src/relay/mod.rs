//! The frame relay loop.
//!
//! One [`Relay::poll`] call is one pass of the cooperative main loop. Each
//! pass runs a fixed sequence of bounded, non-blocking check-then-act steps:
//!
//! ```text
//!  host intake ──► from_host ──► CAN transmit ──┐ (echo)
//!                                               ▼
//!  CAN receive ───────────────────────► send-or-enqueue ──► to_host ──► TX pump
//!  error edge  ───────────────────────►        │                          │
//!                                               └──── sent ──► pool ◄─────┘
//! ```
//!
//! Buffers move between the pool and the two queues as [`FrameHandle`]s.
//! A step that cannot finish puts the handle back where it came from
//! (`push_front` for queued frames, `release` for fresh ones) and the
//! condition is re-checked on the next pass.
use core::convert::Infallible;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::pool::{FrameHandle, FramePool};
use crate::queue::FrameQueue;
use crate::traits::{
    Activity, ActivityIndicator, Bootloader, CanChannel, HostLink, MonotonicClock,
};

mod heartbeat;

use heartbeat::Heartbeat;

//==================================================================================Enums and Structs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What the send-or-enqueue policy did with a frame.
pub(crate) enum Delivery {
    /// Transmitted to the host immediately; the buffer is back in the pool.
    Sent,
    /// Parked on the to-host queue for the transmit pump.
    Enqueued,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Result of one relay pass.
pub enum PollOutcome {
    /// Keep looping.
    Continue,
    /// The host asked for the bootloader; the caller must hand off now.
    DetachRequested,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Traffic counters. All wrap on overflow.
pub struct RelayStats {
    /// Frames taken in from the host.
    pub host_rx: u32,
    /// Host frames accepted by the CAN controller.
    pub can_tx: u32,
    /// CAN transmit attempts rejected and retried.
    pub can_tx_retries: u32,
    /// Frames delivered to the host (echoes, bus frames, error reports).
    pub host_tx: u32,
    /// Host transmit attempts rejected.
    pub host_tx_retries: u32,
    /// Frames received from the CAN bus.
    pub can_rx: u32,
    /// Receive attempts that found nothing despite a pending flag.
    pub spurious_rx: u32,
    /// Error status changes reported to the host.
    pub error_reports: u32,
    /// Passes where a frame could not originate because the pool was empty.
    pub pool_exhausted: u32,
}

/// Relay context: the adapters, the frame pool, and the two transfer queues.
///
/// `N` sizes the pool and both queues, so every queue can always hold every
/// buffer in the system.
pub struct Relay<C, H, K, I, const N: usize> {
    can: C,
    host: H,
    clock: K,
    indicator: I,
    config: RelayConfig,
    pool: FramePool<N>,
    from_host: FrameQueue<N>,
    to_host: FrameQueue<N>,
    last_error_status: u32,
    heartbeat: Heartbeat,
    stats: RelayStats,
}

impl<C, H, K, I, const N: usize> Relay<C, H, K, I, N>
where
    C: CanChannel,
    H: HostLink,
    K: MonotonicClock,
    I: ActivityIndicator,
{
    /// Assemble the relay. All `N` buffers start in the pool.
    pub fn new(can: C, host: H, clock: K, indicator: I, config: RelayConfig) -> Self {
        #[cfg(feature = "defmt")]
        defmt::info!("Relay started with {} frame buffers", N);

        Self {
            can,
            host,
            clock,
            indicator,
            config,
            pool: FramePool::new(),
            from_host: FrameQueue::new(),
            to_host: FrameQueue::new(),
            last_error_status: config.initial_error_status,
            heartbeat: Heartbeat::new(config.heartbeat_period_us),
            stats: RelayStats::default(),
        }
    }

    //==================================================================================Main loop
    /// Run passes forever. Only leaves through the bootloader, or with an
    /// error when a queue contract is violated.
    pub fn run<B: Bootloader>(&mut self, bootloader: &mut B) -> Result<Infallible, RelayError> {
        loop {
            if self.poll()? == PollOutcome::DetachRequested {
                #[cfg(feature = "defmt")]
                defmt::info!("Host requested detach, entering bootloader");
                bootloader.enter();
            }
        }
    }

    /// Execute one pass of the relay.
    pub fn poll(&mut self) -> Result<PollOutcome, RelayError> {
        self.intake_from_host()?;
        self.relay_host_to_can()?;
        if self.host.tx_ready() {
            self.pump_to_host()?;
        }
        self.relay_can_to_host()?;
        self.report_error_status()?;
        self.housekeeping();

        if self.host.detach_requested() {
            return Ok(PollOutcome::DetachRequested);
        }
        Ok(PollOutcome::Continue)
    }

    //==================================================================================Steps
    /// Host-side receive path: move one host frame into the from-host queue.
    fn intake_from_host(&mut self) -> Result<(), RelayError> {
        if !self.host.rx_pending() {
            return Ok(());
        }
        // Pool empty: the frame waits in the link's own buffering.
        let Some(handle) = self.pool.acquire() else {
            self.stats.pool_exhausted = self.stats.pool_exhausted.wrapping_add(1);
            return Ok(());
        };

        match self.host.receive(self.pool.frame_mut(&handle)) {
            Ok(()) => {
                self.stats.host_rx = self.stats.host_rx.wrapping_add(1);
                self.from_host.push_back(handle)?;
            }
            Err(_err) => self.pool.release(handle)?,
        }
        Ok(())
    }

    /// Transmit the oldest host frame on CAN and echo it back on success.
    fn relay_host_to_can(&mut self) -> Result<(), RelayError> {
        let Some(handle) = self.from_host.pop_front() else {
            return Ok(());
        };

        match self.can.transmit(self.pool.frame(&handle)) {
            Ok(()) => {
                // echo_id is the host's and stays as is.
                self.pool.frame_mut(&handle).timestamp_us = self.clock.now_us();
                self.stats.can_tx = self.stats.can_tx.wrapping_add(1);
                self.send_to_host_or_enqueue(handle)?;
                self.indicator.indicate(Activity::CanTransmit);
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("CAN transmit rejected, retrying next pass");
                self.stats.can_tx_retries = self.stats.can_tx_retries.wrapping_add(1);
                self.from_host.push_front(handle)?;
            }
        }
        Ok(())
    }

    /// Transmit the oldest queued frame to the host.
    fn pump_to_host(&mut self) -> Result<(), RelayError> {
        let Some(handle) = self.to_host.pop_front() else {
            return Ok(());
        };

        match self.host.transmit(self.pool.frame(&handle)) {
            Ok(()) => {
                self.stats.host_tx = self.stats.host_tx.wrapping_add(1);
                self.pool.release(handle)?;
            }
            Err(_err) => {
                self.stats.host_tx_retries = self.stats.host_tx_retries.wrapping_add(1);
                self.to_host.push_front(handle)?;
            }
        }
        Ok(())
    }

    /// Receive one bus frame and hand it to the host path.
    fn relay_can_to_host(&mut self) -> Result<(), RelayError> {
        if !self.can.rx_pending() {
            return Ok(());
        }
        // Pool empty: the frame stays in the controller FIFO for the next pass.
        let Some(handle) = self.pool.acquire() else {
            #[cfg(feature = "defmt")]
            defmt::debug!("Frame pool exhausted, CAN receive deferred");
            self.stats.pool_exhausted = self.stats.pool_exhausted.wrapping_add(1);
            return Ok(());
        };

        match self.can.receive(self.pool.frame_mut(&handle)) {
            Ok(()) => {
                let now = self.clock.now_us();
                self.pool.frame_mut(&handle).stamp_local(now);
                self.stats.can_rx = self.stats.can_rx.wrapping_add(1);
                self.send_to_host_or_enqueue(handle)?;
                self.indicator.indicate(Activity::CanReceive);
            }
            Err(_err) => {
                self.stats.spurious_rx = self.stats.spurious_rx.wrapping_add(1);
                self.pool.release(handle)?;
            }
        }
        Ok(())
    }

    /// Report the controller error status when it differs from the last
    /// reported value.
    fn report_error_status(&mut self) -> Result<(), RelayError> {
        let status = self.can.error_status();
        if status == self.last_error_status {
            return Ok(());
        }
        // Skipped edges are not recorded, so they are retried next pass.
        let Some(handle) = self.pool.acquire() else {
            self.stats.pool_exhausted = self.stats.pool_exhausted.wrapping_add(1);
            return Ok(());
        };

        let now = self.clock.now_us();
        let frame = self.pool.frame_mut(&handle);
        frame.stamp_local(now);

        if self.can.parse_error_status(status, frame) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "CAN error status changed: {=u32:#x} -> {=u32:#x}",
                self.last_error_status,
                status
            );
            self.send_to_host_or_enqueue(handle)?;
            self.last_error_status = status;
            self.stats.error_reports = self.stats.error_reports.wrapping_add(1);
        } else {
            self.pool.release(handle)?;
        }
        Ok(())
    }

    fn housekeeping(&mut self) {
        let now = self.clock.now_us();
        if self.heartbeat.is_due(now) {
            self.indicator.toggle_heartbeat();
        }
        self.indicator.update(now);
    }

    //==================================================================================Delivery policy
    /// Hand a frame to the host path. Ownership of `handle` always leaves the
    /// caller; the buffer returns to the pool once it reaches the host.
    ///
    /// Hosts on the queued protocol only ever get frames through the transmit
    /// pump. Legacy hosts get an immediate attempt that falls back to the
    /// queue.
    fn send_to_host_or_enqueue(&mut self, handle: FrameHandle) -> Result<Delivery, RelayError> {
        if self.config.uses_queued_delivery(self.host.protocol_version()) {
            self.to_host.push_back(handle)?;
            return Ok(Delivery::Enqueued);
        }

        match self.host.transmit(self.pool.frame(&handle)) {
            Ok(()) => {
                self.stats.host_tx = self.stats.host_tx.wrapping_add(1);
                self.pool.release(handle)?;
                Ok(Delivery::Sent)
            }
            Err(_err) => {
                self.stats.host_tx_retries = self.stats.host_tx_retries.wrapping_add(1);
                self.to_host.push_back(handle)?;
                Ok(Delivery::Enqueued)
            }
        }
    }
}

//==================================================================================Accessors
impl<C, H, K, I, const N: usize> Relay<C, H, K, I, N> {
    pub fn can(&self) -> &C {
        &self.can
    }

    pub fn can_mut(&mut self) -> &mut C {
        &mut self.can
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Frame buffers, including those currently queued.
    pub fn pool(&self) -> &FramePool<N> {
        &self.pool
    }

    /// Host frames waiting for the CAN controller.
    pub fn from_host(&self) -> &FrameQueue<N> {
        &self.from_host
    }

    /// Frames waiting for the host.
    pub fn to_host(&self) -> &FrameQueue<N> {
        &self.to_host
    }

    /// Last error status successfully reported to the host.
    pub fn last_error_status(&self) -> u32 {
        self.last_error_status
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Buffers accounted for by the pool and the queues. Between passes this
    /// is always `N`.
    pub fn accounted_frames(&self) -> usize {
        self.pool.available() + self.from_host.len() + self.to_host.len()
    }
}
