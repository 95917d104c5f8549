//! # Durian shop client
//!
//! Client-side workflows for the durian shop, built as a set of services. Each service owns
//! its state and drains a message queue one request at a time; callers talk to it through a
//! cloneable client handle.
//!
//! - **Checkout** ([`checkout_actor`]) validates the delivery form, submits the cart as an
//!   order, then clears the cart and moves to the confirmation screen.
//! - **Admin dashboard** ([`admin_actor`]) probes the backend, lists accounts and moderates
//!   them: role changes, deactivation with a reason, reactivation and deletion.
//!
//! Remote calls never block a service. They run as background tasks and report back as
//! messages on the same queue, so a service that has been shut down simply never hears
//! about them.
//!
//! ```no_run
//! # async fn demo(collaborators: durian_shop::app_system::Collaborators) -> Result<(), String> {
//! use durian_shop::app_system::ShopSystem;
//!
//! let system = ShopSystem::new(collaborators);
//! system.session.resolve().await;
//!
//! system.cart_client.add_item("Musang King".into(), 100.0, 2).await.map_err(|e| e.to_string())?;
//! system.checkout_client.set_address("12 Jalan Durian".into()).await.map_err(|e| e.to_string())?;
//! system.checkout_client.set_phone("09171234567".into()).await.map_err(|e| e.to_string())?;
//! system.checkout_client.submit().await.map_err(|e| e.to_string())?;
//!
//! system.shutdown().await
//! # }
//! ```

pub mod actor_framework;
pub mod admin_actor;
pub mod api;
pub mod app_system;
pub mod cart_actor;
pub mod checkout_actor;
pub mod clients;
pub mod domain;
pub mod messages;
pub mod session;
pub mod ui;

#[cfg(test)]
mod mock_framework;
