//! Lazy page-following over the order listing

use std::collections::VecDeque;

use futures::Stream;
use serde::Deserialize;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::{ListOptions, Order};

/// One page of the order listing
#[derive(Debug, Deserialize)]
struct OrderPage {
    #[serde(rename = "_links", default)]
    links: PageLinks,
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    /// Absolute URL of the following page
    #[serde(default)]
    next: Option<String>,
}

/// Single-pass sequence of orders spanning any number of pages
///
/// The next page is requested only when the buffered one is used up. A page
/// error is yielded once and ends the sequence.
#[derive(Debug)]
pub struct OrderList {
    transport: Transport,
    next_url: Option<String>,
    /// State filter, sent with the first request only; `next` links already carry it
    state: Option<String>,
    buffer: VecDeque<Order>,
    limit: usize,
    yielded: usize,
}

impl OrderList {
    pub(crate) fn new(transport: Transport, url: String, options: ListOptions) -> Self {
        Self {
            transport,
            next_url: Some(url),
            state: options.state.map(|s| s.as_str().to_string()),
            buffer: VecDeque::new(),
            limit: options.limit,
            yielded: 0,
        }
    }

    /// Next order, fetching another page if needed
    ///
    /// Returns `None` once the listing or the limit is exhausted.
    pub async fn next(&mut self) -> Option<Result<Order>> {
        if self.limit > 0 && self.yielded >= self.limit {
            self.finish();
            return None;
        }

        while self.buffer.is_empty() {
            let url = self.next_url.take()?;
            match self.fetch_page(&url).await {
                Ok(page) => {
                    tracing::debug!(url = %url, orders = page.orders.len(), "fetched order page");
                    self.next_url = page.links.next;
                    self.buffer.extend(page.orders);
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }

        let order = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(Ok(order))
    }

    /// Drain the listing into a vector, stopping at the first error
    pub async fn try_collect_all(mut self) -> Result<Vec<Order>> {
        let mut orders = Vec::new();
        while let Some(order) = self.next().await {
            orders.push(order?);
        }
        Ok(orders)
    }

    /// Adapt into a [`Stream`] for use with `futures` combinators
    pub fn into_stream(self) -> impl Stream<Item = Result<Order>> + Send {
        futures::stream::unfold(self, |mut list| async move {
            list.next().await.map(|order| (order, list))
        })
    }

    async fn fetch_page(&mut self, url: &str) -> Result<OrderPage> {
        match self.state.take() {
            Some(state) => {
                self.transport
                    .get_json(url, &[("state", state.as_str())])
                    .await
            }
            None => self.transport.get_json(url, &[]).await,
        }
    }

    fn finish(&mut self) {
        self.next_url = None;
        self.buffer.clear();
    }
}
