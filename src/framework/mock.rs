//! # Mock Framework
//!
//! Utilities for testing clients and actors in isolation.
//!
//! Two styles are available:
//! - [`MockClient`] with a fluent expectation API (`expect_get(..).return_ok(..)`),
//!   verified at the end of the test;
//! - [`create_mock_client`] plus the `expect_*` helpers, for tests that want
//!   to inspect the raw request and answer it by hand.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A queued expectation: which request comes next, and what to answer.
#[allow(dead_code)] // Update/Delete expectations have no builders yet
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError<T::Error>>,
    },
    Create {
        response: Result<T::Id, FrameworkError<T::Error>>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError<T::Error>>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError<T::Error>>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError<T::Error>>,
    },
}

/// A mock client with expectation tracking.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Restaurant>::new();
/// mock.expect_get(RestaurantId(1)).return_ok(Some(restaurant));
///
/// let client = RestaurantClient::new(mock.client());
/// // drive the code under test...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        // Background task answering requests from the expectation queue.
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { respond_to, .. },
                        Some(Expectation::Get { response, .. }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { respond_to, .. },
                        Some(Expectation::Update { response, .. }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete { response, .. }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Some(Expectation::Action { response, .. }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    pub fn return_ok(self, value: Option<T>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: FrameworkError<T::Error>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> CreateExpectationBuilder<T> {
    pub fn return_ok(self, id: T::Id) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Create { response: Ok(id) });
    }

    pub fn return_err(self, error: FrameworkError<T::Error>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Create {
                response: Err(error),
            });
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    pub fn return_ok(self, result: T::ActionResult) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action {
                id: self.id,
                response: Ok(result),
            });
    }

    pub fn return_err(self, error: FrameworkError<T::Error>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action {
                id: self.id,
                response: Err(error),
            });
    }
}

// ---------------------------------------------------------------------------
// Raw-channel helpers
// ---------------------------------------------------------------------------

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends into a channel the test controls; the test inspects the
/// arriving [`ResourceRequest`] and answers through its oneshot responder,
/// simulating actor behavior (success, failure, delay) deterministically.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Receives the next message, asserting it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, crate::framework::Response<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Receives the next message, asserting it is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, crate::framework::Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Receives the next message, asserting it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    crate::framework::Response<T::ActionResult, T::Error>,
)> {
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
    use crate::model::{MenuEntry, Restaurant, RestaurantCreate, RestaurantId};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn raw_mock_answers_create() {
        let (client, mut receiver) = create_mock_client::<Restaurant>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(RestaurantCreate {
                    name: "Pizza Corner".to_string(),
                    url: None,
                    menu: vec![],
                })
                .await
        });

        let (params, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(params.name, "Pizza Corner");
        responder.send(Ok(RestaurantId(1))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), RestaurantId(1));
    }

    #[tokio::test]
    async fn fluent_mock_answers_in_order_and_verifies() {
        let mut mock = MockClient::<Restaurant>::new();

        let restaurant = Restaurant {
            id: RestaurantId(1),
            name: "Pizza Corner".to_string(),
            url: None,
            menu: vec![MenuEntry::new("Margherita", dec!(8.50))],
        };
        mock.expect_create().return_ok(RestaurantId(1));
        mock.expect_get(RestaurantId(1)).return_ok(Some(restaurant));

        let client = mock.client();
        let id = client
            .create(RestaurantCreate {
                name: "Pizza Corner".to_string(),
                url: None,
                menu: vec![],
            })
            .await
            .unwrap();
        assert_eq!(id, RestaurantId(1));

        let fetched = client.get(RestaurantId(1)).await.unwrap();
        assert_eq!(fetched.unwrap().name, "Pizza Corner");

        mock.verify();
    }
}
