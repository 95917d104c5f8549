//! Client handles for the services. Cheap to clone; every call is a message to the owning service.

#[macro_use]
mod macros;

pub mod admin_client;
pub mod cart_client;
pub mod checkout_client;

pub use admin_client::AdminClient;
pub use cart_client::CartClient;
pub use checkout_client::CheckoutClient;
