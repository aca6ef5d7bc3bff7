//! Poll an order until it reaches a terminal state

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::OrdersClient;
use crate::config::WaitOptions;
use crate::error::{Error, Result};
use crate::progress::{ProgressUpdate, emit};
use crate::types::{Order, OrderId};

impl OrdersClient {
    /// Poll until the order reaches a terminal state
    ///
    /// See [`wait_with_cancel`](Self::wait_with_cancel).
    pub async fn wait(&self, id: &OrderId, options: &WaitOptions) -> Result<Order> {
        self.wait_with_cancel(id, options, &CancellationToken::new())
            .await
    }

    /// Poll until the order reaches a terminal state or `cancel` fires
    ///
    /// Every fetch counts as one attempt and is reported to the progress sink.
    /// Fetches start `options.delay` apart; a slow fetch eats into the following
    /// sleep. With a non-zero `max_attempts`, returns
    /// [`Error::AttemptsExceeded`] once that many fetches came back non-terminal.
    /// The order itself is left alone on cancellation.
    pub async fn wait_with_cancel(
        &self,
        id: &OrderId,
        options: &WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<Order> {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            let started = Instant::now();

            let order = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = self.get(id) => result?,
            };

            tracing::debug!(order_id = %id, state = %order.state, attempt, "polled order");
            emit(
                self.progress.as_ref(),
                ProgressUpdate::State {
                    order_id: id.clone(),
                    state: order.state.clone(),
                    attempt,
                },
            );

            if order.state.is_terminal() {
                tracing::info!(order_id = %id, state = %order.state, attempts = attempt, "order reached final state");
                return Ok(order);
            }

            if options.max_attempts != 0 && attempt >= options.max_attempts {
                tracing::warn!(
                    order_id = %id,
                    state = %order.state,
                    max_attempts = options.max_attempts,
                    "giving up on order"
                );
                return Err(Error::AttemptsExceeded {
                    max_attempts: options.max_attempts,
                });
            }

            let remaining = options.delay.saturating_sub(started.elapsed());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(remaining) => {}
            }
        }
    }
}
