/// A line in the shopper's cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Payload for adding a new line to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemCreate {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Payload for editing an existing cart line.
#[derive(Debug, Clone, Default)]
pub struct CartItemPatch {
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
