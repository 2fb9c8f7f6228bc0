//! Demo binary: one full order round through the system.
//!
//! Registers a restaurant with a small menu, opens a session, lets two
//! participants order (one price pre-filled from the menu), locks, closes,
//! and prints both exports.

use chrono::{Duration, Utc};
use mealboard::lifecycle::{setup_tracing, MealboardSystem};
use mealboard::model::{
    ItemDraft, MenuEntry, Participant, RestaurantCreate, SessionCreate,
};
use rust_decimal::Decimal;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting mealboard demo");

    let system = MealboardSystem::new();

    let restaurant_id = system
        .restaurants
        .create_restaurant(RestaurantCreate {
            name: "Pizza Corner".to_string(),
            url: Some("https://pizza.example".to_string()),
            menu: vec![
                MenuEntry::new("Margherita", Decimal::new(850, 2)),
                MenuEntry::new("Calzone", Decimal::new(1050, 2)),
            ],
        })
        .await
        .map_err(|e| e.to_string())?;

    let olive = Participant::new(1, "Olive");
    let bo = Participant::new(2, "Bo");
    let admin = Participant::admin(99, "Root");

    let span = tracing::info_span!("order_round");
    let session_id = async {
        info!("Opening session");
        system
            .sessions
            .create_session(SessionCreate {
                title: "Friday lunch".to_string(),
                restaurant_id,
                deadline: Some(Utc::now() + Duration::hours(2)),
                notes: Some("orders go out at noon sharp".to_string()),
                created_by: olive.clone(),
            })
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(%session_id, "Session open, taking orders");

    // Menu dish without a price: the actor pre-fills 8.50 from the menu.
    system
        .sessions
        .add_item(session_id, olive.clone(), ItemDraft::new("Margherita", 1))
        .await
        .map_err(|e| e.to_string())?;
    system
        .sessions
        .add_item(
            session_id,
            bo.clone(),
            ItemDraft::new("Calzone", 2).noted("extra cheese"),
        )
        .await
        .map_err(|e| e.to_string())?;

    let board = system
        .sessions
        .board(session_id)
        .await
        .map_err(|e| e.to_string())?;
    info!(
        participants = board.snapshot.participants.len(),
        total = %board.snapshot.grand_total,
        "Board aggregated"
    );

    system
        .sessions
        .lock_session(session_id, olive)
        .await
        .map_err(|e| e.to_string())?;
    system
        .sessions
        .close_session(session_id, admin)
        .await
        .map_err(|e| e.to_string())?;

    let text = system
        .sessions
        .export_text(session_id)
        .await
        .map_err(|e| e.to_string())?;
    println!("{text}\n");

    let csv = system
        .sessions
        .export_csv(session_id)
        .await
        .map_err(|e| e.to_string())?;
    println!("{csv}");

    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
