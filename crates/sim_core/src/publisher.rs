//! Publishing seam: the fleet hands each serialized snapshot to a [`Publisher`]
//! keyed by vehicle id. Delivery guarantees belong to the implementation.

use std::io::Write;

use bevy_ecs::prelude::Resource;

use crate::error::PublishError;

/// Trait for telemetry sinks. Implementations must be `Send + Sync` so the
/// publisher can be stored as an ECS resource.
pub trait Publisher: Send + Sync {
    /// Fire-and-forget send. Must not block on delivery acknowledgment.
    fn send(&mut self, key: &str, payload: &[u8]) -> Result<(), PublishError>;

    /// Waits for buffered messages to be delivered.
    fn flush(&mut self) -> Result<(), PublishError>;
}

/// ECS resource wrapping a boxed publisher.
#[derive(Resource)]
pub struct PublisherResource(pub Box<dyn Publisher>);

/// Writes one `key<TAB>payload` line per message.
pub struct JsonLinesPublisher<W> {
    writer: W,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesPublisher<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + Sync> Publisher for JsonLinesPublisher<W> {
    fn send(&mut self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        self.writer.write_all(key.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(payload)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PublishError> {
        self.writer.flush()?;
        Ok(())
    }
}
