//! MTP Food Core - Shared types library.
//!
//! This crate provides common types used across all MTP Food components:
//! - `storefront` - Cart state, menu, booking flow and backend API client
//! - `cli` - Headless command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, contact details and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
