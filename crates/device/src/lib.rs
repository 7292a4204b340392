//! Interfaces to the device hardware a capture session needs, with the
//! acquisition policies (fix retries, camera fallbacks) and RAII guards that
//! release what they hold.

pub mod capabilities;
pub mod haptics;
pub mod location;
pub mod media;
pub mod simulated;

pub use capabilities::Devices;
pub use haptics::{HapticPattern, Haptics};
pub use location::{LocationError, LocationProvider, WatchGuard};
pub use media::{CameraGuard, MediaCapture, MediaError};
