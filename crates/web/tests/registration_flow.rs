mod common;

use common::{DownGateway, EventSpec, FakeGateway, seed_event, setup_test_db};
use rust_decimal::Decimal;
use storage::Database;
use storage::dto::registration::RegisterTeamRequest;
use storage::dto::team::CreateTeamRequest;
use uuid::Uuid;
use web::features::participation::services;

async fn make_team(db: &Database, event_id: Uuid, user_id: i64) -> Uuid {
    let req = CreateTeamRequest {
        user_id,
        name: format!("team-{}", Uuid::new_v4()),
        is_individual: false,
    };
    services::create_team(db.pool(), event_id, &req)
        .await
        .unwrap()
        .id
}

fn register_request(team_id: Uuid, user_id: i64) -> RegisterTeamRequest {
    RegisterTeamRequest {
        user_id,
        team_id,
        contact_name: None,
        contact_phone: None,
        contact_email: None,
        waiver_signed: false,
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn free_event_registration_is_immediately_confirmed() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(&db, EventSpec::default()).await;
    let team_id = make_team(&db, event_id, 101).await;

    let outcome = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_id, 101),
    )
    .await
    .unwrap();

    assert!(outcome.payment.is_none());
    assert_eq!(outcome.registration.status, "confirmed");
    assert_eq!(outcome.registration.payment_status, "paid");
    assert_eq!(gateway.intent_count(), 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn fee_event_registration_starts_pending_with_an_intent() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(
        &db,
        EventSpec { fee: Decimal::new(19900, 2), ..Default::default() },
    )
    .await;
    let team_id = make_team(&db, event_id, 101).await;

    let outcome = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_id, 101),
    )
    .await
    .unwrap();

    let intent = outcome.payment.expect("payment descriptor expected");
    assert_eq!(intent.amount, Decimal::new(19900, 2));
    assert_eq!(outcome.registration.status, "pending");
    assert_eq!(outcome.registration.payment_status, "pending");
    assert_eq!(gateway.intent_count(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn only_team_members_may_register() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(&db, EventSpec::default()).await;
    let team_id = make_team(&db, event_id, 101).await;

    let err = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_id, 999),
    )
    .await
    .unwrap_err();

    assert_eq!(err.reason(), Some("not_team_member"));
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn a_team_registers_at_most_once() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(&db, EventSpec::default()).await;
    let team_id = make_team(&db, event_id, 101).await;

    services::register_team(db.pool(), &gateway, event_id, &register_request(team_id, 101))
        .await
        .unwrap();
    let err = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_id, 101),
    )
    .await
    .unwrap_err();

    assert_eq!(err.reason(), Some("already_registered"));
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn team_capacity_rejects_the_extra_team() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(&db, EventSpec { capacity_team: Some(1), ..Default::default() }).await;

    let team_a = make_team(&db, event_id, 101).await;
    let team_b = make_team(&db, event_id, 201).await;

    services::register_team(db.pool(), &gateway, event_id, &register_request(team_a, 101))
        .await
        .unwrap();

    let err = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_b, 201),
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), Some("team_capacity_reached"));

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE team_id = $1")
            .bind(team_b)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn player_capacity_counts_members_of_registered_teams() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id =
        seed_event(&db, EventSpec { capacity_player: Some(2), ..Default::default() }).await;

    let team_a = make_team(&db, event_id, 101).await;
    services::join_team(db.pool(), event_id, team_a, 102)
        .await
        .unwrap();
    services::register_team(db.pool(), &gateway, event_id, &register_request(team_a, 101))
        .await
        .unwrap();

    let team_b = make_team(&db, event_id, 201).await;
    let err = services::register_team(
        db.pool(),
        &gateway,
        event_id,
        &register_request(team_b, 201),
    )
    .await
    .unwrap_err();

    assert_eq!(err.reason(), Some("player_capacity_reached"));
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn gateway_failure_rolls_the_registration_back() {
    let db = setup_test_db().await;
    let event_id = seed_event(
        &db,
        EventSpec { fee: Decimal::new(5000, 2), ..Default::default() },
    )
    .await;
    let team_id = make_team(&db, event_id, 101).await;

    let err = services::register_team(
        db.pool(),
        &DownGateway,
        event_id,
        &register_request(team_id, 101),
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), Some("payment_gateway_unavailable"));

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn concurrent_registrations_cannot_overrun_capacity() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let event_id = seed_event(&db, EventSpec { capacity_team: Some(1), ..Default::default() }).await;

    let team_a = make_team(&db, event_id, 101).await;
    let team_b = make_team(&db, event_id, 201).await;

    // Both requests race the same capacity check; the event-row lock must
    // let exactly one of them through.
    let req_a = register_request(team_a, 101);
    let req_b = register_request(team_b, 201);
    let (a, b) = tokio::join!(
        services::register_team(db.pool(), &gateway, event_id, &req_a),
        services::register_team(db.pool(), &gateway, event_id, &req_b),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    let loser = if a.is_ok() { b } else { a };
    assert_eq!(loser.unwrap_err().reason(), Some("team_capacity_reached"));

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn draft_events_do_not_accept_registrations() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();

    let published = seed_event(&db, EventSpec::default()).await;
    let team_id = make_team(&db, published, 101).await;

    // Vendor pulls the event back to draft before the team registers.
    sqlx::query("UPDATE events SET status = 'draft' WHERE id = $1")
        .bind(published)
        .execute(db.pool())
        .await
        .unwrap();

    let err = services::register_team(
        db.pool(),
        &gateway,
        published,
        &register_request(team_id, 101),
    )
    .await
    .unwrap_err();

    assert_eq!(err.reason(), Some("event_not_found"));
}
