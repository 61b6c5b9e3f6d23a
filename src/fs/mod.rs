//! Device access
//!
//! Opening drives, probing their capacity, and throttling reads from them.

mod device;
pub mod throttle;

pub use device::*;
pub use throttle::{BandwidthLimiter, ThrottledReader};
