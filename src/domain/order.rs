use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CartItem;

/// How the buyer pays on delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "GCash")]
    MobileWallet,
    #[serde(rename = "Card")]
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::CashOnDelivery, Self::MobileWallet, Self::Card];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "COD",
            Self::MobileWallet => "GCash",
            Self::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown payment method: {s} (expected COD, GCash or Card)"))
    }
}

/// One ordered line as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Body of `POST /api/checkout`. Built fresh for every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub email: String,
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

impl OrderPayload {
    /// Snapshot the cart into a payload. The total is always derived from the lines.
    pub fn from_cart(
        email: impl Into<String>,
        cart: &[CartItem],
        address: impl Into<String>,
        phone: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        let items: Vec<OrderLine> = cart
            .iter()
            .map(|item| OrderLine {
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
            })
            .collect();
        let total = cart.iter().map(CartItem::line_total).sum();

        Self {
            email: email.into(),
            items,
            total,
            address: address.into(),
            phone: phone.into(),
            payment_method,
        }
    }
}

/// Response body of `POST /api/checkout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl CheckoutResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}
