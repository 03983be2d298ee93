//! Chunk lifecycle notifications.
//!
//! Downstream systems (mesh building, collision, feature placement) subscribe to a
//! [`ChunkEventHub`] and receive every load and unload on their own channel.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::chunk::TerrainChunk;
use crate::coord::ChunkCoord;

/// A transition into or out of the loaded set.
#[derive(Clone, Debug)]
pub enum ChunkEvent {
    /// The chunk was materialized. Carries its full data.
    Loaded(Arc<TerrainChunk>),
    /// The chunk was evicted; resources keyed by this coordinate should be released.
    Unloaded(ChunkCoord),
}

impl ChunkEvent {
    /// The coordinate this event refers to.
    pub fn coord(&self) -> ChunkCoord {
        match self {
            ChunkEvent::Loaded(chunk) => chunk.coord(),
            ChunkEvent::Unloaded(coord) => *coord,
        }
    }
}

/// Fans lifecycle events out to every live subscriber.
///
/// Channels are unbounded so publishing never blocks the scheduler. Subscribers whose
/// receiver has been dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct ChunkEventHub {
    subscribers: Vec<Sender<ChunkEvent>>,
}

impl ChunkEventHub {
    /// Creates a hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<ChunkEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers `event` to all subscribers.
    pub fn publish(&mut self, event: ChunkEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            tracing::debug!(dropped, "pruned disconnected chunk event subscribers");
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_terrain::{BiomeId, Heightfield};

    fn chunk(x: i32, z: i32) -> Arc<TerrainChunk> {
        Arc::new(TerrainChunk::new(
            ChunkCoord::new(x, z),
            Heightfield::filled(2, 0.5, BiomeId(0)),
        ))
    }

    #[test]
    fn test_every_subscriber_receives_events() {
        let mut hub = ChunkEventHub::new();
        let a = hub.subscribe();
        let b = hub.subscribe();

        hub.publish(ChunkEvent::Loaded(chunk(0, 0)));
        hub.publish(ChunkEvent::Unloaded(ChunkCoord::new(2, 0)));

        for rx in [a, b] {
            let events: Vec<_> = rx.try_iter().collect();
            assert_eq!(events.len(), 2);
            assert!(matches!(events[0], ChunkEvent::Loaded(_)));
            assert_eq!(events[1].coord(), ChunkCoord::new(2, 0));
        }
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut hub = ChunkEventHub::new();
        let keep = hub.subscribe();
        drop(hub.subscribe());
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(ChunkEvent::Unloaded(ChunkCoord::new(0, 0)));
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(keep.try_iter().count(), 1);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let mut hub = ChunkEventHub::new();
        hub.publish(ChunkEvent::Loaded(chunk(4, 4)));
        assert_eq!(hub.subscriber_count(), 0);
    }
}
