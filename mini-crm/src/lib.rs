pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
pub mod widgets;

use data_access::{AuthService, OrderStore};
use std::sync::Arc;

/// Shared application state: the order store and the auth service it
/// authenticates with.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(orders: Arc<OrderStore>, auth: Arc<AuthService>) -> Self {
        Self { orders, auth }
    }
}
