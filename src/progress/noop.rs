//! Sink that discards all updates

use super::traits::{ProgressSink, ProgressUpdate, SinkError};

/// Progress sink used when the caller does not want progress output
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    fn report(&self, _update: &ProgressUpdate) -> Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
