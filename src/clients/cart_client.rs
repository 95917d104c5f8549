use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::cart_actor::CartError;
use crate::domain::{CartItem, CartItemCreate, CartItemPatch};

impl From<FrameworkError> for CartError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Rejected(reason) => Self::InvalidItem(reason),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(error.to_string())
            }
        }
    }
}

/// The cart provider: read accessors plus explicit mutations, all served by the cart actor.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<CartItem>,
}

impl CartClient {
    pub fn new(inner: ResourceClient<CartItem>) -> Self {
        Self { inner }
    }

    /// Add units of a product. A product already in the cart (same name) gets its quantity
    /// increased instead of a second line; the cart actor does the merge, so concurrent adds
    /// of one product still end up on one line. Returns the line id.
    #[instrument(skip(self))]
    pub async fn add_item(&self, name: String, price: f64, quantity: u32) -> Result<String, CartError> {
        debug!("Sending request");
        Ok(self
            .inner
            .create(CartItemCreate { name, price, quantity })
            .await?)
    }

    /// All lines in the order they were added.
    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Vec<CartItem>, CartError> {
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(&self, id: String, quantity: u32) -> Result<CartItem, CartError> {
        let patch = CartItemPatch {
            quantity: Some(quantity),
            ..CartItemPatch::default()
        };
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: String) -> Result<(), CartError> {
        Ok(self.inner.delete(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        debug!("Sending request");
        Ok(self.inner.clear().await?)
    }

    #[instrument(skip(self))]
    pub async fn total(&self) -> Result<f64, CartError> {
        Ok(self.items().await?.iter().map(CartItem::line_total).sum())
    }
}
