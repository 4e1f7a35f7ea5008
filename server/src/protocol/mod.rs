//! View documents returned by each step of the booking flow

pub mod views;

pub use views::*;
