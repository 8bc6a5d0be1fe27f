//! JSON lines event writer

use std::io::Write;

use super::{WordEvent, WordSink};

/// Writes each event as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &WordEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> WordSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &WordEvent) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!("Failed to write event {}: {}", event, e);
        }
    }
}
