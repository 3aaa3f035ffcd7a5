// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific time types.
//!
//! Record timestamps are wall-clock time.  On native platforms these types come from
//! `std::time`; `std::time::SystemTime::now` panics on wasm32, so there they come from
//! `web_time`.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, SystemTime, UNIX_EPOCH};
