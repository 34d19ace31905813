//! CLI command implementations.

pub mod booking;
pub mod cart;
pub mod menu;
