//! # Core Actor Framework
//!
//! Generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: the trait a resource type implements to be managed.
//! - [`ResourceActor`]: the generic actor owning a store of entities.
//! - [`ResourceClient`]: the generic, cloneable client side.
//! - [`FrameworkError`]: channel and lookup failures, generic over the
//!   entity's own error type so domain errors cross the actor boundary
//!   fully typed.
//!
//! ## Concurrency Model
//! Each [`ResourceActor`] runs in its own Tokio task and processes its
//! messages sequentially, so the entity store needs no `Mutex` or `RwLock`:
//! exclusive ownership within the task is the serialization discipline.
//! Writes to one resource are therefore totally ordered, while independent
//! actors run in parallel.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Trait that any resource entity must implement to be managed by
/// [`ResourceActor`].
///
/// # Architecture Note
/// By defining one contract that all resource types satisfy, the actor loop
/// is written once and reused everywhere. Associated types keep it type
/// safe: a session actor cannot be sent a restaurant payload, and every
/// operation fails with the entity's own error enum rather than a stringly
/// wrapper.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so entities can call other actors. The
/// `Context` associated type carries those dependencies and is injected
/// into [`ResourceActor::run`], not the constructor ("late binding", which
/// avoids circular wiring).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Unique identifier. Must be constructible from the actor's internal
    /// `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload for creating a new instance.
    type Create: Send + Sync + Debug;

    /// Payload for updating an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into every hook. Use `()` when none.
    type Context: Send + Sync;

    /// The entity's error enum. One type per actor: the union of everything
    /// its hooks can fail with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from the ID and payload, synchronously, before
    /// `on_create` runs.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle hooks ---

    /// Called right after construction; use for validation or side effects
    /// (e.g. checking another actor). Failing here aborts the create.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for every update request.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called right before removal.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

/// Errors produced by the framework plumbing, parameterized over the
/// entity's error so callers can match domain failures directly.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError<E> {
    #[error("actor closed")]
    ActorClosed,
    #[error("actor dropped response channel")]
    ActorDropped,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Entity(E),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

/// Internal message type sent to the actor.
///
/// The variants map to the standard resource lifecycle (create, get,
/// update, delete) plus an `Action` escape hatch for operations that do not
/// fit the CRUD mold. Everything is typed via the [`ActorEntity`]
/// associated types.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

/// The generic actor that owns a collection of entities.
///
/// The "server" half: it holds the store and the receiving end of the
/// channel, and allocates ids from an internal counter.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` caps the mpsc channel; senders wait when it is full,
    /// which bounds how much work can pile up behind one actor.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the event loop until every client is dropped.
    ///
    /// The `context` is handed to every entity hook, so dependencies wired
    /// after construction (other actors' clients, the clock) are available
    /// inside the entity.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ = respond_to.send(Err(FrameworkError::Entity(e)));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::Entity(e)));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::Entity(e)));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::Entity(e)));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(FrameworkError::Entity);
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

/// A type-safe, cloneable client for a [`ResourceActor`].
///
/// Holds only the channel sender, so clones are cheap and can be handed to
/// any task.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn update(
        &self,
        id: T::Id,
        update: T::Update,
    ) -> Result<T, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A minimal standalone entity exercising the full trait surface.

    #[derive(Clone, Debug, PartialEq)]
    struct Tab {
        #[allow(dead_code)]
        id: u32,
        label: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct TabCreate {
        label: String,
    }

    #[derive(Debug)]
    struct TabUpdate {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum TabAction {
        Pin,
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum TabError {
        #[error("already pinned")]
        AlreadyPinned,
    }

    #[async_trait]
    impl ActorEntity for Tab {
        type Id = u32;
        type Create = TabCreate;
        type Update = TabUpdate;
        type Action = TabAction;
        type ActionResult = ();
        type Context = ();
        type Error = TabError;

        fn from_create_params(id: u32, params: TabCreate) -> Result<Self, TabError> {
            Ok(Self {
                id,
                label: params.label,
                pinned: false,
            })
        }

        async fn on_update(&mut self, update: TabUpdate, _ctx: &()) -> Result<(), TabError> {
            if let Some(label) = update.label {
                self.label = label;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: TabAction, _ctx: &()) -> Result<(), TabError> {
            match action {
                TabAction::Pin => {
                    if self.pinned {
                        return Err(TabError::AlreadyPinned);
                    }
                    self.pinned = true;
                    Ok(())
                }
            }
        }
    }

    #[tokio::test]
    async fn crud_and_actions_round_trip() {
        let (actor, client) = ResourceActor::<Tab>::new(10);
        tokio::spawn(actor.run(()));

        let id = client
            .create(TabCreate {
                label: "lunch".into(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        client.perform_action(id, TabAction::Pin).await.unwrap();
        let tab = client.get(id).await.unwrap().unwrap();
        assert!(tab.pinned);

        // Entity errors come back typed, not stringly.
        let err = client.perform_action(id, TabAction::Pin).await.unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::Entity(TabError::AlreadyPinned)
        ));

        let updated = client
            .update(
                id,
                TabUpdate {
                    label: Some("dinner".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.label, "dinner");

        client.delete(id).await.unwrap();
        assert!(client.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let (actor, client) = ResourceActor::<Tab>::new(10);
        tokio::spawn(actor.run(()));

        let err = client.perform_action(7, TabAction::Pin).await.unwrap_err();
        assert!(matches!(err, FrameworkError::NotFound(_)));
    }
}
