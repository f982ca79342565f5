//! EventEmitter - イベントの組み立てと発行
//!
//! 発行は任意（advisory）の副作用なので、失敗はログに残して `Outcome` に
//! 記録するだけで、呼び出し元にはエラーを返さない。

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::{Advisory, AdvisoryKind, Event, EventMetadata, Outcome, Topic};
use crate::ports::{Clock, EventBus, IdGenerator};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("no topic for scan event with status '{0}'")]
    UnsupportedStatus(String),

    #[error("event is missing {0}")]
    Incomplete(&'static str),
}

pub struct EventEmitter {
    bus: Arc<dyn EventBus>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl EventEmitter {
    pub fn new(bus: Arc<dyn EventBus>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { bus, ids, clock }
    }

    /// Resolve the topic and stamp ID / time onto the metadata.
    pub fn build(&self, metadata: EventMetadata) -> Result<Event, EventError> {
        let topic = match &metadata {
            EventMetadata::ScanImage { artifact, status } => {
                if artifact.digest.is_empty() {
                    return Err(EventError::Incomplete("artifact digest"));
                }
                metadata
                    .topic()
                    .ok_or_else(|| EventError::UnsupportedStatus(status.clone()))?
            }
            EventMetadata::Retention { .. } => Topic::TagRetention,
        };

        Ok(Event {
            id: self.ids.generate_event_id(),
            topic,
            occurred_at: self.clock.now(),
            data: metadata,
        })
    }

    /// Build and publish; failures come back as advisories.
    pub async fn emit(&self, metadata: EventMetadata) -> Outcome {
        let event = match self.build(metadata) {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "failed to build event");
                return Outcome::applied().with_advisory(Advisory::new(
                    AdvisoryKind::EventBuild,
                    e.to_string(),
                ));
            }
        };

        match self.bus.publish(&event).await {
            Ok(()) => {
                debug!(event_id = %event.id, topic = ?event.topic, "event published");
                Outcome::applied().with_published(1)
            }
            Err(e) => {
                error!(event_id = %event.id, topic = ?event.topic, error = %e, "event publish failed");
                Outcome::applied()
                    .with_advisory(Advisory::new(AdvisoryKind::EventPublish, e.to_string()))
            }
        }
    }
}
