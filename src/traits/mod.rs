//! Abstraction traits for the relay's external collaborators: CAN channel,
//! USB host link, monotonic clock, activity indicators, and bootloader entry.
pub mod bootloader;
pub mod can_channel;
pub mod clock;
pub mod host_link;
pub mod indicator;

pub use bootloader::Bootloader;
pub use can_channel::CanChannel;
pub use clock::MonotonicClock;
pub use host_link::HostLink;
pub use indicator::{Activity, ActivityIndicator, NoIndicator};
