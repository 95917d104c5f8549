/// Custom actions for cart lines.
#[derive(Debug, Clone)]
pub enum CartItemAction {
    /// Adds units to an existing line, used when the same product is added twice.
    AddQuantity(u32),
}

/// Results from [`CartItemAction`]s - variants match 1:1 with the actions.
#[derive(Debug, Clone, PartialEq)]
pub enum CartItemActionResult {
    /// The line's quantity after the addition.
    AddQuantity(u32),
}
