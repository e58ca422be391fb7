//! Small shared utilities.

/// Frame timing with smoothed FPS.
pub mod frame_timing;

pub use frame_timing::FrameTiming;
