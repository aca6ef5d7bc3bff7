//! Create, get, list and cancel orders

use super::OrdersClient;
use super::pagination::OrderList;
use crate::error::Result;
use crate::request::OrderRequest;
use crate::types::{ListOptions, Order, OrderId};

impl OrdersClient {
    /// Submit a new order
    ///
    /// A request the service rejects comes back as [`Error::Validation`](crate::Error::Validation)
    /// with the service's explanation as the message.
    pub async fn create(&self, request: &OrderRequest) -> Result<Order> {
        tracing::debug!(name = %request.name, products = request.products.len(), "creating order");

        let order: Order = self.transport.post_json(&self.orders_url(), request).await?;

        tracing::info!(order_id = %order.id, state = %order.state, "order created");
        Ok(order)
    }

    /// Fetch the current record of an order
    pub async fn get(&self, id: &OrderId) -> Result<Order> {
        self.transport.get_json(&self.order_url(id.as_str()), &[]).await
    }

    /// List orders in service order, optionally filtered by state
    ///
    /// Pages are fetched lazily as the returned [`OrderList`] is consumed.
    pub fn list(&self, options: ListOptions) -> OrderList {
        OrderList::new(self.transport.clone(), self.orders_url(), options)
    }

    /// Ask the service to cancel an order
    ///
    /// Returns the record the service reports after cancellation. No local
    /// state changes; an in-progress [`wait`](Self::wait) sees the new state on its next fetch.
    pub async fn cancel(&self, id: &OrderId) -> Result<Order> {
        let order: Order = self.transport.put_json(&self.order_url(id.as_str())).await?;

        tracing::info!(order_id = %order.id, state = %order.state, "order cancelled");
        Ok(order)
    }
}
