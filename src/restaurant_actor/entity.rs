//! Entity trait implementation for the restaurant reference data.

use super::{RestaurantAction, RestaurantActionResult, RestaurantError};
use crate::framework::ActorEntity;
use crate::model::{Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Restaurant {
    type Id = RestaurantId;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Action = RestaurantAction;
    type ActionResult = RestaurantActionResult;
    type Context = ();
    type Error = RestaurantError;

    fn from_create_params(
        id: RestaurantId,
        params: RestaurantCreate,
    ) -> Result<Self, RestaurantError> {
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            url: params.url,
            menu: params.menu,
        })
    }

    async fn on_update(
        &mut self,
        update: RestaurantUpdate,
        _ctx: &(),
    ) -> Result<(), RestaurantError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(url) = update.url {
            self.url = Some(url);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RestaurantAction,
        _ctx: &(),
    ) -> Result<RestaurantActionResult, RestaurantError> {
        match action {
            RestaurantAction::AddDish(entry) => {
                if self.dish(&entry.name).is_some() {
                    return Err(RestaurantError::DuplicateDish(entry.name));
                }
                self.menu.push(entry);
                Ok(RestaurantActionResult::DishAdded)
            }
            RestaurantAction::QuoteDish(name) => {
                Ok(RestaurantActionResult::Quote(self.dish(&name).cloned()))
            }
        }
    }
}
