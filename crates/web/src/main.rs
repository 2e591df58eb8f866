use anyhow::Context;
use storage::Database;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use web::config::Config;
use web::{AppState, payments};

#[derive(OpenApi)]
#[openapi(
    paths(
        web::features::events::handlers::list_public_events,
        web::features::events::handlers::get_event,
        web::features::events::handlers::list_event_registrations,
        web::features::participation::handlers::create_team,
        web::features::participation::handlers::join_team,
        web::features::participation::handlers::leave_team,
        web::features::participation::handlers::register_team,
        web::features::payments::handlers::create_intent,
        web::features::payments::handlers::payment_webhook,
        web::features::registrations::handlers::get_registration,
        web::features::registrations::handlers::submit_waiver,
    ),
    components(
        schemas(
            storage::dto::event::EventSummaryResponse,
            storage::dto::event::EventDetailResponse,
            storage::dto::team::CreateTeamRequest,
            storage::dto::team::MembershipRequest,
            storage::dto::team::TeamCreatedResponse,
            storage::dto::team::OkResponse,
            storage::dto::registration::RegisterTeamRequest,
            storage::dto::registration::RegistrationResponse,
            storage::dto::registration::SubmitWaiverRequest,
            storage::dto::registration::WaiverResponse,
            storage::models::Event,
            storage::models::Team,
            storage::models::TeamMember,
            storage::models::Registration,
            web::features::participation::handlers::RegisterResponse,
            web::features::payments::handlers::CreateIntentRequest,
            web::payments::PaymentIntent,
        )
    ),
    tags(
        (name = "events", description = "Public event endpoints"),
        (name = "participation", description = "Team formation and event registration"),
        (name = "payments", description = "Payment intents and webhook reconciliation"),
        (name = "registrations", description = "Registration detail and waivers"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting gaming-café events API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let gateway = payments::from_config(&config.payment)
        .context("Failed to configure payment gateway")?;
    tracing::info!("Payment provider: {}", gateway.name());

    let state = AppState::new(db, gateway, config.payment.default_currency.clone());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let app = web::app(state).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
