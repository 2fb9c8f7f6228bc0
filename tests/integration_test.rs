use chrono::{DateTime, Duration, TimeZone, Utc};
use mealboard::clients::ActorClient;
use mealboard::clock::FixedClock;
use mealboard::lifecycle::MealboardSystem;
use mealboard::model::{
    ItemDraft, ItemPatch, MenuEntry, Participant, RestaurantCreate, RestaurantId, SessionCreate,
    SessionId, SessionState,
};
use mealboard::session_actor::SessionError;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap()
}

async fn register_restaurant(system: &MealboardSystem) -> RestaurantId {
    system
        .restaurants
        .create_restaurant(RestaurantCreate {
            name: "Pizza Corner".to_string(),
            url: None,
            menu: vec![MenuEntry::new("Margherita", dec!(8.50))],
        })
        .await
        .expect("Failed to create restaurant")
}

async fn open_session(
    system: &MealboardSystem,
    restaurant_id: RestaurantId,
    deadline: Option<DateTime<Utc>>,
    organizer: &Participant,
) -> SessionId {
    system
        .sessions
        .create_session(SessionCreate {
            title: "Friday lunch".to_string(),
            restaurant_id,
            deadline,
            notes: None,
            created_by: organizer.clone(),
        })
        .await
        .expect("Failed to create session")
}

/// Full end-to-end round with all real actors: order, aggregate, lock,
/// close, export.
#[tokio::test]
async fn test_full_order_round() {
    let clock = Arc::new(FixedClock::new(noon() - Duration::hours(2)));
    let system = MealboardSystem::with_clock(clock);

    let restaurant_id = register_restaurant(&system).await;
    let olive = Participant::new(1, "Olive");
    let bo = Participant::new(2, "Bo");
    let admin = Participant::admin(99, "Root");

    let session_id = open_session(&system, restaurant_id, Some(noon()), &olive).await;

    // Menu dish without a price gets pre-filled from the menu.
    let margherita = system
        .sessions
        .add_item(session_id, olive.clone(), ItemDraft::new("Margherita", 1))
        .await
        .expect("Failed to add item");
    assert_eq!(margherita.price, Some(dec!(8.50)));

    // Free-text dish stays price-pending.
    let special = system
        .sessions
        .add_item(
            session_id,
            bo.clone(),
            ItemDraft::new("chef special", 2).noted("spicy"),
        )
        .await
        .expect("Failed to add item");
    assert_eq!(special.price, None);

    let board = system.sessions.board(session_id).await.expect("Failed to get board");
    assert_eq!(board.state, SessionState::Open);
    assert_eq!(board.restaurant_name, "Pizza Corner");
    assert_eq!(board.snapshot.item_count, 2);
    assert_eq!(board.snapshot.total_quantity, 3);
    assert_eq!(board.snapshot.grand_total, dec!(8.50));
    assert!(board.snapshot.participants[1].lines[0].price_pending());

    // Reads are idempotent: same state, same snapshot.
    let board_again = system.sessions.board(session_id).await.expect("Failed to get board");
    assert_eq!(board, board_again);

    // Close before lock refuses.
    let err = system
        .sessions
        .close_session(session_id, admin.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotLocked { state: SessionState::Open }));

    // The organizer locks, the admin closes.
    let state = system
        .sessions
        .lock_session(session_id, olive.clone())
        .await
        .expect("Failed to lock");
    assert_eq!(state, SessionState::Locked);
    let state = system
        .sessions
        .close_session(session_id, admin)
        .await
        .expect("Failed to close");
    assert_eq!(state, SessionState::Closed);

    // No further mutation, but the closed session stays viewable.
    let err = system
        .sessions
        .add_item(session_id, olive, ItemDraft::new("too late", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotEditable { .. }));
    assert_eq!(
        system
            .sessions
            .list_items(session_id)
            .await
            .expect("Failed to list items")
            .len(),
        2
    );

    let text = system
        .sessions
        .export_text(session_id)
        .await
        .expect("Failed to export text");
    assert_eq!(
        text,
        "Pizza Corner (deadline: 2024-05-03 12:00)\n\
         Olive: Margherita x1 — 8.50\n\
         Bo: chef special x2 (spicy) —\n\
         Total: 8.50 (2 items)"
    );

    let csv = system
        .sessions
        .export_csv(session_id)
        .await
        .expect("Failed to export csv");
    assert!(csv.starts_with("participant,item,quantity,unit_price,line_total,notes\n"));
    assert!(csv.contains("Olive,Margherita,1,8.50,8.50,\n"));

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Deadline scenario: an item added before the deadline survives, mutation
/// after it fails, and the board still reports the earlier subtotal.
#[tokio::test]
async fn test_deadline_locks_on_access() {
    let clock = Arc::new(FixedClock::new(noon() - Duration::minutes(10)));
    let system = MealboardSystem::with_clock(clock.clone());

    let restaurant_id = register_restaurant(&system).await;
    let u1 = Participant::new(1, "U1");
    let session_id = open_session(&system, restaurant_id, Some(noon()), &u1).await;

    // T-10: item lands.
    system
        .sessions
        .add_item(
            session_id,
            u1.clone(),
            ItemDraft::new("burger", 2).priced(dec!(5.00)),
        )
        .await
        .expect("Failed to add item");

    // T+1: the same participant is refused, with the deadline as cause.
    clock.advance(Duration::minutes(11));
    let err = system
        .sessions
        .add_item(session_id, u1.clone(), ItemDraft::new("fries", 1))
        .await
        .unwrap_err();
    match err {
        SessionError::NotEditable { state, cause } => {
            assert_eq!(state, SessionState::Locked);
            assert_eq!(cause, mealboard::model::LockCause::Deadline);
        }
        other => panic!("Expected NotEditable, got {other:?}"),
    }

    // The board reflects the lock and the frozen subtotal.
    let board = system.sessions.board(session_id).await.expect("Failed to get board");
    assert_eq!(board.state, SessionState::Locked);
    assert_eq!(board.snapshot.participants[0].subtotal, dec!(10.00));
    assert_eq!(board.snapshot.grand_total, dec!(10.00));

    // Deadline lock counts as locked: the admin can close directly.
    let state = system
        .sessions
        .close_session(session_id, Participant::admin(99, "Root"))
        .await
        .expect("Failed to close");
    assert_eq!(state, SessionState::Closed);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Ownership: editing someone else's item refuses unless the editor is an
/// admin.
#[tokio::test]
async fn test_item_authorization() {
    let clock = Arc::new(FixedClock::new(noon()));
    let system = MealboardSystem::with_clock(clock);

    let restaurant_id = register_restaurant(&system).await;
    let u1 = Participant::new(1, "U1");
    let u2 = Participant::new(2, "U2");
    let session_id = open_session(&system, restaurant_id, None, &u1).await;

    let item = system
        .sessions
        .add_item(
            session_id,
            u1.clone(),
            ItemDraft::new("burger", 1).priced(dec!(4.50)),
        )
        .await
        .expect("Failed to add item");

    let err = system
        .sessions
        .edit_item(
            session_id,
            u2.clone(),
            item.id,
            ItemPatch::default().requantify(3),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Forbidden { .. }));

    let err = system
        .sessions
        .remove_item(session_id, u2, item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Forbidden { .. }));

    // An admin may edit any item; partial patch touches only the quantity.
    let edited = system
        .sessions
        .edit_item(
            session_id,
            Participant::admin(99, "Root"),
            item.id,
            ItemPatch::default().requantify(3),
        )
        .await
        .expect("Failed to edit item");
    assert_eq!(edited.quantity, 3);
    assert_eq!(edited.price, Some(dec!(4.50)));

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Admin reopen override: a closed session accepts items again and the
/// updated board reflects them.
#[tokio::test]
async fn test_reopen_override() {
    let clock = Arc::new(FixedClock::new(noon() - Duration::hours(1)));
    let system = MealboardSystem::with_clock(clock.clone());

    let restaurant_id = register_restaurant(&system).await;
    let u1 = Participant::new(1, "U1");
    let admin = Participant::admin(99, "Root");
    let session_id = open_session(&system, restaurant_id, Some(noon()), &u1).await;

    system
        .sessions
        .lock_session(session_id, admin.clone())
        .await
        .expect("Failed to lock");
    system
        .sessions
        .close_session(session_id, admin.clone())
        .await
        .expect("Failed to close");

    // Only admins may reopen.
    let err = system
        .sessions
        .reopen_session(session_id, u1.clone(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Forbidden { .. }));

    let state = system
        .sessions
        .reopen_session(session_id, admin, Some(noon() + Duration::hours(2)))
        .await
        .expect("Failed to reopen");
    assert_eq!(state, SessionState::Open);

    system
        .sessions
        .add_item(
            session_id,
            u1,
            ItemDraft::new("second round", 1).priced(dec!(3.00)),
        )
        .await
        .expect("Failed to add item after reopen");

    let board = system.sessions.board(session_id).await.expect("Failed to get board");
    assert_eq!(board.state, SessionState::Open);
    assert_eq!(board.snapshot.item_count, 1);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Concurrent adds against one session: the actor serializes them, none
/// are lost, and the totals add up.
#[tokio::test]
async fn test_concurrent_item_adds() {
    let clock = Arc::new(FixedClock::new(noon()));
    let system = MealboardSystem::with_clock(clock);

    let restaurant_id = register_restaurant(&system).await;
    let organizer = Participant::new(1, "U1");
    let session_id = open_session(&system, restaurant_id, None, &organizer).await;

    let mut handles = vec![];
    for i in 0..10u32 {
        let sessions = system.sessions.clone();
        let participant = Participant::new(i % 3 + 1, format!("U{}", i % 3 + 1));
        let handle = tokio::spawn(async move {
            sessions
                .add_item(
                    session_id,
                    participant,
                    ItemDraft::new(format!("dish {i}"), 1).priced(dec!(2.00)),
                )
                .await
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap().expect("Concurrent add failed");
    }

    let board = system.sessions.board(session_id).await.expect("Failed to get board");
    assert_eq!(board.snapshot.item_count, 10);
    assert_eq!(board.snapshot.grand_total, dec!(20.00));
    let summed: rust_decimal::Decimal = board
        .snapshot
        .participants
        .iter()
        .map(|p| p.subtotal)
        .sum();
    assert_eq!(summed, board.snapshot.grand_total);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Unknown restaurant reference refuses session creation; unknown session
/// ids report not found.
#[tokio::test]
async fn test_missing_references() {
    let clock = Arc::new(FixedClock::new(noon()));
    let system = MealboardSystem::with_clock(clock);

    let err = system
        .sessions
        .create_session(SessionCreate {
            title: "nowhere".to_string(),
            restaurant_id: RestaurantId(42),
            deadline: None,
            notes: None,
            created_by: Participant::new(1, "U1"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));

    let err = system.sessions.board(SessionId(7)).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));

    assert!(system
        .sessions
        .get(SessionId(7))
        .await
        .expect("Failed to get session")
        .is_none());

    system.shutdown().await.expect("Failed to shutdown system");
}
