//! Sink that fans updates out over a broadcast channel

use super::traits::{ProgressSink, ProgressUpdate, SinkError};
use tokio::sync::broadcast;

/// Forwards updates to every subscriber
///
/// Sending never blocks. Slow subscribers that fall more than `capacity`
/// updates behind see `RecvError::Lagged` and skip ahead; having no
/// subscribers at all is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastProgress {
    tx: broadcast::Sender<ProgressUpdate>,
}

impl BroadcastProgress {
    /// Create a channel buffering up to `capacity` updates per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to updates sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.tx.subscribe()
    }
}

impl ProgressSink for BroadcastProgress {
    fn report(&self, update: &ProgressUpdate) -> Result<(), SinkError> {
        // Err only means nobody is listening
        self.tx.send(update.clone()).ok();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "broadcast"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderId, OrderState};

    fn state(s: OrderState) -> ProgressUpdate {
        ProgressUpdate::State {
            order_id: OrderId::from("oid"),
            state: s,
            attempt: 1,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_updates_in_order() {
        let sink = BroadcastProgress::new(16);
        let mut rx1 = sink.subscribe();
        let mut rx2 = sink.subscribe();

        sink.report(&state(OrderState::Queued)).unwrap();
        sink.report(&state(OrderState::Running)).unwrap();

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap(), state(OrderState::Queued));
            assert_eq!(rx.recv().await.unwrap(), state(OrderState::Running));
        }
    }

    #[test]
    fn reporting_without_subscribers_is_ok() {
        let sink = BroadcastProgress::new(4);
        assert!(sink.report(&state(OrderState::Success)).is_ok());
    }
}
