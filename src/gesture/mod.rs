//! Gesture module
//!
//! Turns per-frame classifications into letters and words:
//! vote window -> word accumulator, driven by [`GestureEngine`].

pub mod accumulator;
pub mod clock;
pub mod engine;
pub mod vote;

pub use accumulator::{TrackingState, WordAccumulator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{FrameOutput, FrameStatus, GestureEngine};
pub use vote::VoteBuffer;
