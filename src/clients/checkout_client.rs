use tokio::sync::mpsc;

use crate::checkout_actor::{CheckoutError, CheckoutView};
use crate::domain::{CheckoutResult, PaymentMethod};
use crate::messages::CheckoutRequest;

/// Client for the checkout screen service.
#[derive(Clone)]
pub struct CheckoutClient {
    sender: mpsc::Sender<CheckoutRequest>,
}

impl_service_client!(CheckoutClient, CheckoutRequest);

client_method!(CheckoutClient => fn set_address(address: String) -> () as CheckoutRequest::SetAddress, Error = CheckoutError);
client_method!(CheckoutClient => fn set_phone(phone: String) -> () as CheckoutRequest::SetPhone, Error = CheckoutError);
client_method!(CheckoutClient => fn set_payment_method(method: PaymentMethod) -> () as CheckoutRequest::SetPaymentMethod, Error = CheckoutError);
client_method!(
    /// Validate the form, submit the order and wait for the backend's verdict.
    CheckoutClient => fn submit() -> CheckoutResult as CheckoutRequest::Submit, Error = CheckoutError
);
client_method!(CheckoutClient => fn view() -> CheckoutView as CheckoutRequest::View, Error = CheckoutError);
