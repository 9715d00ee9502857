pub mod auth;
pub mod orders;

pub use auth::{AuthService, AuthState};
pub use orders::{OrderStore, OrdersState};
