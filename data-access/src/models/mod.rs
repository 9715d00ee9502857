pub mod auth;
pub mod order;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, User};
pub use order::{calculate_totals, CreateOrder, NewOrder, Order, Totals, UpdateOrder};
