//! Wrap-safe periodic trigger for the heartbeat indicator.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    period_us: u32,
    last_toggle_us: u32,
}

impl Heartbeat {
    /// Start counting from time zero, like the free-running timer does.
    pub const fn new(period_us: u32) -> Self {
        Self {
            period_us,
            last_toggle_us: 0,
        }
    }

    /// Whether a full period has elapsed since the last toggle. Re-arms when
    /// it returns `true`.
    pub fn is_due(&mut self, now_us: u32) -> bool {
        if now_us.wrapping_sub(self.last_toggle_us) >= self.period_us {
            self.last_toggle_us = now_us;
            true
        } else {
            false
        }
    }
}
