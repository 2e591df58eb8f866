use sqlx::PgPool;
use storage::{
    dto::registration::RegisterTeamRequest,
    dto::team::CreateTeamRequest,
    error::StorageError,
    models::{Registration, Team, TeamMember},
    repository::registration::NewRegistration,
    repository::{EventRepository, RegistrationRepository, TeamRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::payments::{PaymentGateway, PaymentIntent};

/// Outcome of registering a team: the stored row plus the payment intent
/// when a fee is due.
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub registration: Registration,
    pub payment: Option<PaymentIntent>,
}

fn event_not_found(e: StorageError) -> WebError {
    match e {
        StorageError::NotFound => WebError::not_found("event_not_found"),
        other => other.into(),
    }
}

fn team_not_found(e: StorageError) -> WebError {
    match e {
        StorageError::NotFound => WebError::not_found("team_not_found"),
        other => other.into(),
    }
}

/// Create a team under a published event; the requester becomes captain.
pub async fn create_team(
    pool: &PgPool,
    event_id: Uuid,
    req: &CreateTeamRequest,
) -> WebResult<Team> {
    let event = EventRepository::new(pool)
        .find_published(event_id)
        .await
        .map_err(event_not_found)?;

    if req.is_individual && !event.is_solo_format() {
        return Err(WebError::bad_request(
            "not_solo_format",
            "event is not solo format",
        ));
    }

    TeamRepository::new(pool)
        .create_with_captain(event.id, &req.name, req.is_individual, req.user_id)
        .await
        .map_err(|e| match e {
            StorageError::ConstraintViolation(ref c) if c == "uq_teams_event_name" => {
                WebError::conflict("team_name_taken", "team name already exists")
            }
            other => other.into(),
        })
}

/// Join an existing multi-member team.
pub async fn join_team(
    pool: &PgPool,
    event_id: Uuid,
    team_id: Uuid,
    user_id: i64,
) -> WebResult<TeamMember> {
    let events = EventRepository::new(pool);
    let teams = TeamRepository::new(pool);

    let event = events.find_visible(event_id).await.map_err(event_not_found)?;
    let team = teams
        .find_in_event(team_id, event_id)
        .await
        .map_err(team_not_found)?;

    if team.is_individual || event.is_solo_format() {
        return Err(WebError::bad_request(
            "individual_team",
            "individual team cannot accept members",
        ));
    }

    let size = teams.member_count(team_id).await?;
    if size >= i64::from(event.max_team_size) {
        return Err(WebError::bad_request(
            "team_full",
            format!("max team size {} reached", event.max_team_size),
        ));
    }

    teams.add_member(team_id, user_id).await.map_err(|e| match e {
        StorageError::ConstraintViolation(ref c) if c == "team_members_pkey" => {
            WebError::conflict("already_joined", "already joined")
        }
        other => other.into(),
    })
}

/// Leave a team. A captain cannot walk out on a crewed team; the last
/// member leaving takes the empty team with them.
pub async fn leave_team(
    pool: &PgPool,
    event_id: Uuid,
    team_id: Uuid,
    user_id: i64,
) -> WebResult<()> {
    let teams = TeamRepository::new(pool);

    EventRepository::new(pool)
        .find_visible(event_id)
        .await
        .map_err(event_not_found)?;

    let member = teams
        .find_member(team_id, user_id)
        .await?
        .ok_or_else(|| WebError::not_found("not_a_member"))?;

    if member.is_captain() && teams.member_count(team_id).await? > 1 {
        return Err(WebError::bad_request(
            "captain_has_members",
            "captain cannot leave while the team has members",
        ));
    }

    match teams.remove_member(team_id, user_id).await {
        Ok(_team_deleted) => Ok(()),
        Err(StorageError::NotFound) => Err(WebError::not_found("not_a_member")),
        Err(other) => Err(other.into()),
    }
}

/// Register a team for an event. The capacity check and the insert run in
/// one transaction under a row lock on the event, so two racing teams
/// cannot both squeeze past a near-full capacity. When a fee is due, the
/// payment intent is requested before the commit; a gateway failure rolls
/// the registration back.
pub async fn register_team(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    event_id: Uuid,
    req: &RegisterTeamRequest,
) -> WebResult<RegistrationOutcome> {
    let teams = TeamRepository::new(pool);

    teams
        .find_in_event(req.team_id, event_id)
        .await
        .map_err(team_not_found)?;

    let is_member = teams.find_member(req.team_id, req.user_id).await?.is_some();
    if !is_member {
        return Err(WebError::forbidden(
            "not_team_member",
            "only a team member can register",
        ));
    }

    let mut tx = pool.begin().await.map_err(StorageError::from)?;

    let event = EventRepository::lock_published(&mut tx, event_id)
        .await
        .map_err(event_not_found)?;

    if RegistrationRepository::exists(&mut tx, event_id, req.team_id).await? {
        return Err(WebError::conflict(
            "already_registered",
            "team is already registered for this event",
        ));
    }

    if let Some(capacity) = event.capacity_team {
        let registered = RegistrationRepository::registered_team_count(&mut tx, event_id).await?;
        if registered >= i64::from(capacity) {
            return Err(WebError::conflict(
                "team_capacity_reached",
                "team capacity reached",
            ));
        }
    }

    if let Some(capacity) = event.capacity_player {
        let players = RegistrationRepository::registered_player_count(&mut tx, event_id).await?;
        if players >= i64::from(capacity) {
            return Err(WebError::conflict(
                "player_capacity_reached",
                "player capacity reached",
            ));
        }
    }

    let new = NewRegistration {
        event_id,
        team_id: req.team_id,
        contact_name: req.contact_name.clone(),
        contact_phone: req.contact_phone.clone(),
        contact_email: req.contact_email.clone(),
        waiver_signed: req.waiver_signed,
        requires_payment: event.requires_payment(),
    };

    let registration = RegistrationRepository::insert(&mut tx, &new)
        .await
        .map_err(|e| match e {
            StorageError::ConstraintViolation(ref c) if c == "uq_registrations_event_team" => {
                WebError::conflict(
                    "already_registered",
                    "team is already registered for this event",
                )
            }
            other => other.into(),
        })?;

    let payment = if event.requires_payment() {
        let metadata = serde_json::json!({
            "event_id": event.id.to_string(),
            "registration_id": registration.id.to_string(),
            "team_id": req.team_id.to_string(),
            "user_id": req.user_id,
        });

        // The transaction is still open: a gateway failure here drops it
        // and the registration row with it.
        let intent = gateway
            .create_intent(event.registration_fee, &event.currency, metadata)
            .await?;

        Some(intent)
    } else {
        None
    };

    tx.commit().await.map_err(StorageError::from)?;

    Ok(RegistrationOutcome {
        registration,
        payment,
    })
}
