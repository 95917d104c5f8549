/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The service's request enum must be in scope and the error type must have an
/// `ActorCommunicationError(String)` variant.
macro_rules! client_method {
    ($(#[$meta:meta])* $client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            $(#[$meta])*
            #[::tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> ::std::result::Result<$return_type, $error_type> {
                ::tracing::debug!("Sending request");
                let (respond_to, response) = ::tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Generate the constructor and a fire-and-forget `shutdown` for a service client.
macro_rules! impl_service_client {
    ($client:ident, $request:ident) => {
        impl $client {
            pub fn new(sender: ::tokio::sync::mpsc::Sender<$request>) -> Self {
                Self { sender }
            }

            /// Ask the service to stop. In-flight remote calls finish but their results are dropped.
            #[::tracing::instrument(skip(self))]
            pub async fn shutdown(&self) -> ::std::result::Result<(), String> {
                ::tracing::debug!("Sending shutdown request");
                self.sender
                    .send($request::Shutdown)
                    .await
                    .map_err(|e| e.to_string())
            }
        }
    };
}
