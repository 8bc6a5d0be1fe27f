//! Hand landmark layout and feature normalization
//!
//! Landmarks follow the 21-point MediaPipe hand topology. The classifier is
//! trained on wrist-relative coordinates, so every frame is translated to put
//! the wrist at the origin before being flattened.

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Points per tracked hand
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Length of a flattened feature vector (21 points x 3 axes)
pub const FEATURE_LEN: usize = HAND_LANDMARK_COUNT * 3;

/// A single 3D hand landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for LandmarkPoint {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<LandmarkPoint> for [f32; 3] {
    fn from(p: LandmarkPoint) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Wrist-relative, flattened hand pose: `[p0.x, p0.y, p0.z, p1.x, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f32; FEATURE_LEN]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Coordinates of landmark `index` relative to the wrist
    pub fn point(&self, index: usize) -> [f32; 3] {
        let base = index * 3;
        [self.0[base], self.0[base + 1], self.0[base + 2]]
    }
}

/// Translate a hand so the wrist sits at the origin and flatten it.
///
/// Fails with [`TrackingError::InvalidInput`] unless exactly 21 points are given.
pub fn normalize(points: &[LandmarkPoint]) -> Result<FeatureVector, TrackingError> {
    check_count(points)?;

    let wrist = points[WRIST];
    let mut features = [0.0f32; FEATURE_LEN];

    for (chunk, p) in features.chunks_exact_mut(3).zip(points) {
        chunk[0] = p.x - wrist.x;
        chunk[1] = p.y - wrist.y;
        chunk[2] = p.z - wrist.z;
    }

    Ok(FeatureVector(features))
}

/// Rough open-hand check: index finger extended and thumb spread.
///
/// Only meaningful for an unmirrored right hand; used for debug output.
pub fn is_hand_open(points: &[LandmarkPoint]) -> Result<bool, TrackingError> {
    check_count(points)?;

    let index_extended = points[INDEX_TIP].y < points[INDEX_PIP].y;
    let thumb_spread = points[THUMB_TIP].x < points[THUMB_IP].x;

    Ok(index_extended && thumb_spread)
}

fn check_count(points: &[LandmarkPoint]) -> Result<(), TrackingError> {
    if points.len() != HAND_LANDMARK_COUNT {
        return Err(TrackingError::InvalidInput {
            expected: HAND_LANDMARK_COUNT,
            actual: points.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_hand(offset: (f32, f32, f32)) -> Vec<LandmarkPoint> {
    (0..HAND_LANDMARK_COUNT)
        .map(|i| {
            let f = i as f32 * 0.01;
            LandmarkPoint::new(offset.0 + f, offset.1 - f, offset.2 + f * 0.5)
        })
        .collect()
}
