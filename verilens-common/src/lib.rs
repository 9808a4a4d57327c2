//! Shared types for the VeriLens services
//!
//! Holds the common error type and configuration resolution logic used by
//! the media analysis service.

pub mod config;
pub mod error;

pub use error::{Error, Result};
