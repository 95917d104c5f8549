//! Plain data carried between the cart, the session and the remote shop API.

pub mod cart;
pub mod order;
pub mod session;
pub mod user;

pub use cart::*;
pub use order::*;
pub use session::*;
pub use user::*;
