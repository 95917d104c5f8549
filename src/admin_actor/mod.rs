//! The admin dashboard: backend status, the user roster and account moderation.

pub mod error;
pub mod service;
pub mod view;

pub use error::*;
pub use service::*;
pub use view::*;
