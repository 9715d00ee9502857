//! Order store: the single source of truth for the order collection.
//!
//! State lives in a `watch` channel so pages and background tasks can read a
//! consistent snapshot or subscribe to changes. Only the store writes it.
//!
//! Local state is never patched from a mutation's response. After every
//! successful create, update or delete the whole collection is fetched again.
//! Overlapping forced reloads are not deduplicated or ordered: whichever
//! response completes last determines the snapshot.

use crate::config::ApiConfig;
use crate::error::{ApiError, OrderOperation, StoreError};
use crate::http::ApiClient;
use crate::models::{CreateOrder, NewOrder, Order, UpdateOrder};
use metrics::counter;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersState {
    /// Orders in the order the backend returned them.
    pub orders: Vec<Order>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct OrderStore {
    client: ApiClient,
    endpoint: String,
    state: watch::Sender<OrdersState>,
}

/// Clears the loading flag when dropped, whichever way the operation exits.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<OrdersState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.loading = false);
    }
}

impl OrderStore {
    pub fn new(client: ApiClient, config: &ApiConfig) -> Self {
        let (state, _) = watch::channel(OrdersState::default());
        Self {
            client,
            endpoint: config.orders_url(),
            state,
        }
    }

    pub fn snapshot(&self) -> OrdersState {
        self.state.borrow().clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.borrow().orders.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrdersState> {
        self.state.subscribe()
    }

    /// Replace the cached orders without touching the network.
    pub fn set_orders(&self, orders: Vec<Order>) {
        self.state.send_modify(|state| state.orders = orders);
    }

    /// Look an order up in the current snapshot.
    pub fn find_by_id(&self, id: i64) -> Option<Order> {
        self.state
            .borrow()
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }

    /// Fetch the collection.
    ///
    /// Skipped when orders are already cached and `force_refresh` is false.
    /// On failure the previous orders are kept and the error is recorded.
    pub async fn load(&self, force_refresh: bool) -> Result<(), StoreError> {
        let cached = !self.state.borrow().orders.is_empty();
        if cached && !force_refresh {
            tracing::debug!("Orders already loaded, skipping fetch");
            return Ok(());
        }

        let _loading = self.begin();

        match self.client.get_json::<Vec<Order>>(&self.endpoint).await {
            Ok(orders) => {
                tracing::info!(count = orders.len(), "Orders loaded");
                self.state.send_modify(|state| state.orders = orders);
                record(OrderOperation::Load, "success");
                Ok(())
            }
            Err(source) => Err(self.fail(OrderOperation::Load, source)),
        }
    }

    /// Create an order with computed totals, then reload the collection.
    pub async fn create(&self, draft: CreateOrder) -> Result<(), StoreError> {
        let payload = NewOrder::try_from(draft)
            .map_err(|e| self.fail(OrderOperation::Create, e.into()))?;
        let _loading = self.begin();

        if let Err(source) = self.client.post_json(&self.endpoint, &payload).await {
            return Err(self.fail(OrderOperation::Create, source));
        }

        tracing::info!(customer = %payload.customer, "Order created");
        record(OrderOperation::Create, "success");
        self.load(true).await
    }

    /// Replace an order with recomputed totals, then reload the collection.
    pub async fn update(&self, draft: UpdateOrder) -> Result<(), StoreError> {
        let payload =
            Order::try_from(draft).map_err(|e| self.fail(OrderOperation::Update, e.into()))?;
        let url = self.order_url(payload.id);
        let _loading = self.begin();

        if let Err(source) = self.client.put_json(&url, &payload).await {
            return Err(self.fail(OrderOperation::Update, source));
        }

        tracing::info!(order_id = payload.id, "Order updated");
        record(OrderOperation::Update, "success");
        self.load(true).await
    }

    /// Delete an order, then reload the collection.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = self.order_url(id);
        let _loading = self.begin();

        if let Err(source) = self.client.delete(&url).await {
            return Err(self.fail(OrderOperation::Delete, source));
        }

        tracing::info!(order_id = id, "Order deleted");
        record(OrderOperation::Delete, "success");
        self.load(true).await
    }

    fn order_url(&self, id: i64) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        LoadingGuard { state: &self.state }
    }

    fn fail(&self, operation: OrderOperation, source: ApiError) -> StoreError {
        tracing::error!(
            operation = operation.as_str(),
            error = %source,
            "Order store operation failed"
        );
        self.state
            .send_modify(|state| state.error = Some(operation.user_message().to_string()));
        record(operation, "failure");

        StoreError { operation, source }
    }
}

fn record(operation: OrderOperation, outcome: &'static str) {
    counter!(
        "orders_store_requests_total",
        "operation" => operation.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
