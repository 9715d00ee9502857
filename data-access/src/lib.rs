//! data-access: remote order collection, totals and authentication state for mini-crm.
pub mod config;
pub mod error;
pub mod http;
pub mod interceptors;
pub mod models;
pub mod services;

pub use config::ApiConfig;
pub use error::{ApiError, OrderOperation, StoreError, TotalsOverflow};
pub use http::ApiClient;
pub use interceptors::{with_access_token, AuthInterceptor, RequestInterceptor};
pub use models::{
    calculate_totals, AuthResponse, CreateOrder, LoginRequest, NewOrder, Order, RegisterRequest,
    Totals, UpdateOrder, User,
};
pub use services::{AuthService, AuthState, OrderStore, OrdersState};
