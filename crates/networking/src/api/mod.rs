//! High-level API wrappers for DealVista endpoints
//!
//! This module provides convenient wrappers around the raw HTTP client,
//! adding local validation before anything goes on the wire.

mod auth;
mod coupons;
mod users;

pub use auth::*;
pub use coupons::*;
pub use users::*;
