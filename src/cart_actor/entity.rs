use crate::actor_framework::Entity;
use crate::domain::{CartItem, CartItemCreate, CartItemPatch};
use super::actions::{CartItemAction, CartItemActionResult};

fn check_price(price: f64) -> Result<(), String> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(format!("price must be a non-negative amount, got {price}"))
    }
}

fn check_quantity(quantity: u32) -> Result<(), String> {
    if quantity == 0 {
        Err("quantity must be at least 1".to_string())
    } else {
        Ok(())
    }
}

impl Entity for CartItem {
    type Id = String;
    type CreatePayload = CartItemCreate;
    type Patch = CartItemPatch;
    type Action = CartItemAction;
    type ActionResult = CartItemActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a cart line from the product name, unit price and quantity.
    ///
    /// # Errors
    /// Rejects a zero quantity, a blank name, or a negative/non-finite price.
    fn from_create(id: String, params: CartItemCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        check_price(params.price)?;
        check_quantity(params.quantity)?;

        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            quantity: params.quantity,
        })
    }

    /// The same product added again grows the existing line. Its unit price is kept.
    fn merge_create(&mut self, params: &CartItemCreate) -> Result<bool, String> {
        if self.name != params.name {
            return Ok(false);
        }
        self.handle_action(CartItemAction::AddQuantity(params.quantity))?;
        Ok(true)
    }

    fn on_update(&mut self, patch: CartItemPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            check_price(price)?;
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            check_quantity(quantity)?;
            self.quantity = quantity;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CartItemAction) -> Result<CartItemActionResult, String> {
        match action {
            CartItemAction::AddQuantity(amount) => {
                check_quantity(amount)?;
                self.quantity = self
                    .quantity
                    .checked_add(amount)
                    .ok_or_else(|| "quantity overflow".to_string())?;
                Ok(CartItemActionResult::AddQuantity(self.quantity))
            }
        }
    }
}
