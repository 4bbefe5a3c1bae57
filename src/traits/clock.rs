//! Monotonic microsecond clock used to stamp frames and pace the heartbeat.

/// Free-running 32-bit microsecond counter. Wraps roughly every 71 minutes;
/// consumers compare timestamps with wrapping arithmetic.
pub trait MonotonicClock {
    fn now_us(&mut self) -> u32;
}

#[cfg(feature = "embassy-time")]
/// Clock backed by the embassy time driver linked into the firmware.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl MonotonicClock for EmbassyClock {
    fn now_us(&mut self) -> u32 {
        // Truncation keeps the host-visible 32-bit wrap behaviour.
        embassy_time::Instant::now().as_micros() as u32
    }
}
