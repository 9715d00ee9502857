//! Reusable page fragments rendered through askama includes.

pub mod confirm_modal;

pub use confirm_modal::ConfirmModal;
