mod common;

use common::{EventSpec, FakeGateway, seed_event, setup_test_db};
use rust_decimal::Decimal;
use storage::Database;
use storage::dto::registration::RegisterTeamRequest;
use storage::dto::team::CreateTeamRequest;
use uuid::Uuid;
use web::features::participation::services as participation;
use web::features::payments::services as payments;

async fn pending_registration(db: &Database, gateway: &FakeGateway) -> Uuid {
    let event_id = seed_event(
        db,
        EventSpec { fee: Decimal::new(9900, 2), ..Default::default() },
    )
    .await;

    let team = participation::create_team(
        db.pool(),
        event_id,
        &CreateTeamRequest {
            user_id: 101,
            name: format!("team-{}", Uuid::new_v4()),
            is_individual: false,
        },
    )
    .await
    .unwrap();

    participation::register_team(
        db.pool(),
        gateway,
        event_id,
        &RegisterTeamRequest {
            user_id: 101,
            team_id: team.id,
            contact_name: None,
            contact_phone: None,
            contact_email: None,
            waiver_signed: false,
        },
    )
    .await
    .unwrap()
    .registration
    .id
}

fn payload(registration_id: Uuid, status: &str) -> Vec<u8> {
    serde_json::json!({
        "registration_id": registration_id.to_string(),
        "status": status,
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn succeeded_webhook_confirms_and_is_idempotent() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let registration_id = pending_registration(&db, &gateway).await;
    let body = payload(registration_id, "succeeded");

    for _ in 0..2 {
        let updated =
            payments::process_webhook(db.pool(), &gateway, &body, FakeGateway::SIGNATURE)
                .await
                .unwrap();
        assert_eq!(updated.payment_status, "paid");
        assert_eq!(updated.status, "confirmed");
    }

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE id = $1")
            .bind(registration_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn failed_webhook_keeps_the_registration_pending() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let registration_id = pending_registration(&db, &gateway).await;

    let updated = payments::process_webhook(
        db.pool(),
        &gateway,
        &payload(registration_id, "failed"),
        FakeGateway::SIGNATURE,
    )
    .await
    .unwrap();

    assert_eq!(updated.payment_status, "failed");
    assert_eq!(updated.status, "pending");
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn bad_signature_changes_nothing() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();
    let registration_id = pending_registration(&db, &gateway).await;

    let err = payments::process_webhook(
        db.pool(),
        &gateway,
        &payload(registration_id, "succeeded"),
        "wrong-signature",
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), Some("invalid_signature"));

    let status: String =
        sqlx::query_scalar("SELECT payment_status FROM registrations WHERE id = $1")
            .bind(registration_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(status, "pending");
}

#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn unknown_registration_reports_not_found() {
    let db = setup_test_db().await;
    let gateway = FakeGateway::default();

    let err = payments::process_webhook(
        db.pool(),
        &gateway,
        &payload(Uuid::new_v4(), "succeeded"),
        FakeGateway::SIGNATURE,
    )
    .await
    .unwrap_err();

    assert_eq!(err.reason(), Some("registration_not_found"));
}
