use thiserror::Error;

use crate::cart_actor::CartError;
use crate::ui::Alert;

/// Shown when the backend gives no better explanation.
pub const GENERIC_CHECKOUT_FAILURE: &str = "Checkout failed.";

/// Errors that can occur while submitting an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("address and phone are required")]
    MissingInformation,
    #[error("phone number must have at least 10 characters")]
    InvalidPhone,
    #[error("a signed-in user with an email is required")]
    LoginRequired,
    #[error("cart is empty")]
    CartEmpty,
    #[error("a submission is already in progress")]
    Busy,
    #[error("checkout rejected: {0}")]
    Rejected(String),
    #[error("cart unavailable: {0}")]
    Cart(#[from] CartError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CheckoutError {
    /// The notice shown for this failure, if the user should see one.
    pub fn alert(&self) -> Option<Alert> {
        let alert = match self {
            Self::MissingInformation => {
                Alert::new("Missing Information", "Please fill in all required fields.")
            }
            Self::InvalidPhone => {
                Alert::new("Invalid Phone Number", "Please enter a valid phone number.")
            }
            Self::LoginRequired => Alert::new("Login Required", "Please log in to continue."),
            Self::CartEmpty => Alert::new("Cart Empty", "Your cart is empty."),
            Self::Rejected(message) => Alert::new("Error", message.clone()),
            Self::Cart(_) => Alert::new("Error", GENERIC_CHECKOUT_FAILURE),
            // The button is disabled while busy; nothing to tell.
            Self::Busy | Self::ActorCommunicationError(_) => return None,
        };
        Some(alert)
    }
}
