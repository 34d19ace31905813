//! MTP Food storefront library.
//!
//! Client-side ordering core: the cart and its persisted snapshot, the menu,
//! the food detail page, the booking flow, and the backend API client. The
//! `mtp` binary drives it headlessly; other front ends can embed it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod booking;
pub mod cart;
pub mod config;
pub mod detail;
pub mod error;
pub mod filters;
pub mod menu;
pub mod session;
pub mod storage;
pub mod wire;

pub use error::{Result, StorefrontError};
