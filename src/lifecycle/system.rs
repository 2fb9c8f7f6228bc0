//! System orchestration: start, wire and stop the actors.

use crate::clients::{RestaurantClient, SessionClient};
use crate::clock::{Clock, SystemClock};
use crate::session_actor::SessionDeps;
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the meal-ordering actor system.
///
/// Responsible for:
/// - **Lifecycle**: starting and stopping all actors
/// - **Wiring**: injecting the restaurant client and the clock into the
///   session actor's context
/// - **Clock selection**: production uses the system clock; tests inject a
///   [`FixedClock`](crate::clock::FixedClock) via [`with_clock`](Self::with_clock)
pub struct MealboardSystem {
    /// Client for the session actor: the coordinator operation set.
    pub sessions: SessionClient,

    /// Client for the restaurant catalog actor.
    pub restaurants: RestaurantClient,

    /// Task handles for all running actors (used for graceful shutdown).
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MealboardSystem {
    /// Starts the system on the real clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Starts the system with an injected clock.
    ///
    /// Actors are created first (no dependencies), then spawned with their
    /// contexts: the session actor receives the restaurant client and the
    /// clock, so every deadline check inside it uses the injected time.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (restaurant_actor, restaurant_generic) = crate::restaurant_actor::new();
        let (session_actor, session_generic) = crate::session_actor::new();

        let restaurants = RestaurantClient::new(restaurant_generic);
        let sessions = SessionClient::new(session_generic);

        let restaurant_handle = tokio::spawn(restaurant_actor.run(()));
        let session_handle = tokio::spawn(session_actor.run(SessionDeps {
            restaurants: restaurants.clone(),
            clock,
        }));

        Self {
            sessions,
            restaurants,
            handles: vec![restaurant_handle, session_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes their channels; each actor drains its
    /// queue and exits its loop. Returns an error if any actor task
    /// panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.sessions);
        drop(self.restaurants);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for MealboardSystem {
    fn default() -> Self {
        Self::new()
    }
}
