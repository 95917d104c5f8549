//! Cart lines as actor-owned entities, including quantity merging.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
