//! Hand tracker receiver
//!
//! Receives JSON-over-UDP packets from the hand tracker helper. Each packet
//! carries the detected hands for one camera frame and, once the helper has
//! loaded its model, the letter prediction for that frame.

use serde::Deserialize;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

use super::landmarks::LandmarkPoint;
use crate::classifier::Prediction;
use crate::config::TrackingConfig;
use crate::error::TrackingError;

/// A single JSON packet from the hand tracker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandPacket {
    /// One entry per detected hand, 21 `[x, y, z]` points each
    #[serde(default)]
    pub hands: Vec<Vec<LandmarkPoint>>,
    /// Whether the helper's letter model is loaded
    #[serde(default)]
    pub model_ready: bool,
    /// Letter prediction for the single tracked hand, if any
    #[serde(default)]
    pub prediction: Option<Prediction>,
}

/// What a packet says about the hand we track
#[derive(Debug, Clone, PartialEq)]
pub enum HandFrame {
    /// No hand in view
    Absent,
    /// Exactly one hand
    Present(Vec<LandmarkPoint>),
    /// Several hands; the frame cannot be attributed to one
    Ambiguous(usize),
}

impl HandPacket {
    pub fn parse(bytes: &[u8]) -> Result<Self, TrackingError> {
        serde_json::from_slice(bytes)
            .map_err(|e| TrackingError::Parse(format!("JSON parse error: {}", e)))
    }

    /// Split into the hand frame and the prediction that goes with it
    pub fn into_frame(self) -> (HandFrame, bool, Option<Prediction>) {
        let mut hands = self.hands;
        let frame = match hands.len() {
            0 => HandFrame::Absent,
            1 => HandFrame::Present(hands.remove(0)),
            n => HandFrame::Ambiguous(n),
        };
        (frame, self.model_ready, self.prediction)
    }
}

/// Hand tracker JSON-over-UDP receiver
pub struct HandReceiver {
    config: TrackingConfig,
    socket: Option<UdpSocket>,
}

impl HandReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
        }
    }

    /// Bind the UDP socket
    pub async fn start(&mut self) -> Result<(), TrackingError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).await.map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        tracing::info!("Hand receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Wait for the next packet
    pub async fn recv(&self) -> Result<HandPacket, TrackingError> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| TrackingError::Receiver("Receiver not started".to_string()))?;

        let mut buf = [0u8; 65536];
        let size = socket
            .recv(&mut buf)
            .await
            .map_err(|e| TrackingError::Receiver(format!("Receive error: {}", e)))?;

        HandPacket::parse(&buf[..size])
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Hand receiver stopped");
    }
}
