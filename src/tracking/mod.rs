//! Tracking module
//!
//! Hand landmark input for the letter pipeline:
//! - Landmark layout and wrist-relative feature normalization
//! - Hand tracker helper packets (JSON over UDP)

pub mod landmarks;
pub mod receiver;

pub use landmarks::{
    is_hand_open, normalize, FeatureVector, LandmarkPoint, FEATURE_LEN, HAND_LANDMARK_COUNT,
};
pub use receiver::{HandFrame, HandPacket, HandReceiver};

#[cfg(test)]
pub(crate) use landmarks::sample_hand;
