//! # Restaurant Client
//!
//! High-level API for the restaurant catalog actor.

use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{MenuEntry, Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate};
use crate::restaurant_actor::{RestaurantAction, RestaurantActionResult, RestaurantError};
use async_trait::async_trait;
use tracing::{debug, instrument};

fn map_error(e: FrameworkError<RestaurantError>) -> RestaurantError {
    match e {
        FrameworkError::Entity(e) => e,
        FrameworkError::NotFound(what) => RestaurantError::NotFound(what),
        other => RestaurantError::Catalog(other.to_string()),
    }
}

/// Client for interacting with the restaurant actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Restaurant> for RestaurantClient {
    type Error = RestaurantError;

    fn inner(&self) -> &ResourceClient<Restaurant> {
        &self.inner
    }

    fn map_error(e: FrameworkError<RestaurantError>) -> RestaurantError {
        map_error(e)
    }
}

impl RestaurantClient {
    /// Register a restaurant, returning its id.
    #[instrument(skip(self, params))]
    pub async fn create_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<RestaurantId, RestaurantError> {
        debug!(name = %params.name, "Sending request");
        self.inner.create(params).await.map_err(map_error)
    }

    /// Rename a restaurant or change its url.
    #[instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(map_error)
    }

    /// Add a dish to a restaurant's menu.
    #[instrument(skip(self, entry))]
    pub async fn add_dish(
        &self,
        id: RestaurantId,
        entry: MenuEntry,
    ) -> Result<(), RestaurantError> {
        debug!(dish = %entry.name, "Sending request");
        match self
            .inner
            .perform_action(id, RestaurantAction::AddDish(entry))
            .await
        {
            Ok(RestaurantActionResult::DishAdded) => Ok(()),
            Ok(_) => unreachable!("AddDish action must return DishAdded result"),
            Err(e) => Err(map_error(e)),
        }
    }

    /// Look up a dish by name. `Ok(None)` when the menu does not list it.
    #[instrument(skip(self))]
    pub async fn quote_dish(
        &self,
        id: RestaurantId,
        name: &str,
    ) -> Result<Option<MenuEntry>, RestaurantError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RestaurantAction::QuoteDish(name.to_string()))
            .await
        {
            Ok(RestaurantActionResult::Quote(entry)) => Ok(entry),
            Ok(_) => unreachable!("QuoteDish action must return Quote result"),
            Err(e) => Err(map_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn quote_dish_returns_menu_entry() {
        let (client, mut receiver) = create_mock_client::<Restaurant>(10);
        let restaurant_client = RestaurantClient::new(client);

        let quote_task = tokio::spawn(async move {
            restaurant_client
                .quote_dish(RestaurantId(1), "Margherita")
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, RestaurantId(1));
        match action {
            RestaurantAction::QuoteDish(name) => assert_eq!(name, "Margherita"),
            _ => panic!("Expected QuoteDish action"),
        }

        responder
            .send(Ok(RestaurantActionResult::Quote(Some(MenuEntry::new(
                "Margherita",
                dec!(8.50),
            )))))
            .unwrap();

        let quote = quote_task.await.unwrap().unwrap();
        assert_eq!(quote.map(|e| e.price), Some(dec!(8.50)));
    }

    #[tokio::test]
    async fn entity_errors_surface_typed() {
        let (client, mut receiver) = create_mock_client::<Restaurant>(10);
        let restaurant_client = RestaurantClient::new(client);

        let add_task = tokio::spawn(async move {
            restaurant_client
                .add_dish(RestaurantId(1), MenuEntry::new("Margherita", dec!(8.50)))
                .await
        });

        let (_, _, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        responder
            .send(Err(FrameworkError::Entity(RestaurantError::DuplicateDish(
                "Margherita".to_string(),
            ))))
            .unwrap();

        let err = add_task.await.unwrap().unwrap_err();
        assert!(matches!(err, RestaurantError::DuplicateDish(_)));
    }
}
