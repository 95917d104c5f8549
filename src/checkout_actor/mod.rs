//! The checkout screen: delivery form, local validation, order submission.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
