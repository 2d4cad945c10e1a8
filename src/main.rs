//! Gather Server - event posting and participation API

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gather_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gather_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gather Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config.stats);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Public events
        .route("/events", get(api::events::search_events))
        .route("/events/:id", get(api::events::get_event))
        // Public categories
        .route("/categories", get(api::categories::list_categories))
        .route("/categories/:cat_id", get(api::categories::get_category))
        // Public compilations
        .route("/compilations", get(api::compilations::list_compilations))
        .route("/compilations/:comp_id", get(api::compilations::get_compilation))
        // Private events
        .route("/users/:user_id/events", get(api::events::list_own_events))
        .route("/users/:user_id/events", post(api::events::create_event))
        .route("/users/:user_id/events/:event_id", get(api::events::get_own_event))
        .route("/users/:user_id/events/:event_id", patch(api::events::update_own_event))
        .route(
            "/users/:user_id/events/:event_id/requests",
            get(api::events::list_event_requests),
        )
        .route(
            "/users/:user_id/events/:event_id/requests",
            patch(api::events::update_event_requests),
        )
        // Private requests
        .route("/users/:user_id/requests", get(api::requests::list_own_requests))
        .route("/users/:user_id/requests", post(api::requests::create_request))
        .route(
            "/users/:user_id/requests/:request_id/cancel",
            patch(api::requests::cancel_request),
        )
        // Admin users
        .route("/admin/users", get(api::users::list_users))
        .route("/admin/users", post(api::users::create_user))
        .route("/admin/users/:user_id", delete(api::users::delete_user))
        // Admin categories
        .route("/admin/categories", post(api::categories::create_category))
        .route("/admin/categories/:cat_id", patch(api::categories::update_category))
        .route("/admin/categories/:cat_id", delete(api::categories::delete_category))
        // Admin events
        .route("/admin/events", get(api::events::search_events_admin))
        .route("/admin/events/:event_id", patch(api::events::update_event_admin))
        // Admin compilations
        .route("/admin/compilations", post(api::compilations::create_compilation))
        .route(
            "/admin/compilations/:comp_id",
            patch(api::compilations::update_compilation),
        )
        .route(
            "/admin/compilations/:comp_id",
            delete(api::compilations::delete_compilation),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
