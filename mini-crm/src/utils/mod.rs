pub mod currency;

pub use currency::{format_eur, format_percent};
