//! Core traits defined in `licensegate-core` and implemented here or by
//! other crates.

pub mod clock;

pub use clock::{Clock, SystemClock};
