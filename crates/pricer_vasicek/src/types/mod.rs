//! Core error types.
//!
//! # Re-exports
//!
//! - [`MomentError`] from `error`

pub mod error;

pub use error::MomentError;
