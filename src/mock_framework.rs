//! # Mock Framework
//!
//! Channel-backed stand-ins for [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! [`create_mock_client`] hands out a real [`ResourceClient`] wired to a receiver the test
//! owns. The `expect_*` helpers pop the next request, check its kind, and return its
//! payload together with the responder, so the test decides what the "actor" answers.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

pub type Requests<T> = mpsc::Receiver<ResourceRequest<T>>;
pub type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, Requests<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

pub async fn expect_create<T: Entity>(
    receiver: &mut Requests<T>,
) -> Option<(T::CreatePayload, Responder<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

pub async fn expect_get<T: Entity>(
    receiver: &mut Requests<T>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_list<T: Entity>(receiver: &mut Requests<T>) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_clear<T: Entity>(receiver: &mut Requests<T>) -> Option<Responder<()>> {
    match receiver.recv().await {
        Some(ResourceRequest::Clear { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_action<T: Entity>(
    receiver: &mut Requests<T>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::{CartItemAction, CartItemActionResult};
    use crate::clients::CartClient;
    use crate::domain::CartItem;

    #[tokio::test]
    async fn test_add_new_item() {
        let (inner, mut receiver) = create_mock_client::<CartItem>(10);
        let cart = CartClient::new(inner);

        let task = tokio::spawn(async move { cart.add_item("D24".into(), 50.0, 2).await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder.send(Ok(Vec::new())).unwrap();

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "D24");
        assert_eq!(payload.quantity, 2);
        responder.send(Ok("line_1".to_string())).unwrap();

        assert_eq!(task.await.unwrap(), Ok("line_1".to_string()));
    }

    #[tokio::test]
    async fn test_add_existing_item_uses_action() {
        let (inner, mut receiver) = create_mock_client::<CartItem>(10);
        let cart = CartClient::new(inner);

        let task = tokio::spawn(async move { cart.add_item("D24".into(), 50.0, 3).await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        let mut existing = CartItem::new("D24", 50.0, 1);
        existing.id = "line_7".to_string();
        responder.send(Ok(vec![existing])).unwrap();

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, "line_7");
        assert!(matches!(action, CartItemAction::AddQuantity(3)));
        responder.send(Ok(CartItemActionResult::AddQuantity(4))).unwrap();

        assert_eq!(task.await.unwrap(), Ok("line_7".to_string()));
    }

    #[tokio::test]
    async fn test_wrong_request_kind() {
        let (client, mut receiver) = create_mock_client::<CartItem>(10);

        tokio::spawn(async move { client.get("line_1".to_string()).await });
        assert!(expect_clear(&mut receiver).await.is_none());
    }
}
