//! Activity and heartbeat indication (status LEDs on the reference board).
//! Cosmetic only: nothing in the relay depends on what an indicator does.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Traffic event worth a blink.
pub enum Activity {
    /// A frame was received from the CAN bus.
    CanReceive,
    /// A host frame was accepted by the CAN controller.
    CanTransmit,
}

/// Sink for relay activity. Every method defaults to doing nothing.
pub trait ActivityIndicator {
    /// Flag a traffic event.
    fn indicate(&mut self, _activity: Activity) {}

    /// Flip the heartbeat output.
    fn toggle_heartbeat(&mut self) {}

    /// Advance blink timing; called once per relay pass.
    fn update(&mut self, _now_us: u32) {}
}

/// Indicator for boards without status outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIndicator;

impl ActivityIndicator for NoIndicator {}
