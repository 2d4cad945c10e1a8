//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{categories, compilations, events, health, requests, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gather API",
        version = "1.0.0",
        description = "Event posting and participation REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users (admin)
        users::list_users,
        users::create_user,
        users::delete_user,
        // Categories
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::list_categories,
        categories::get_category,
        // Events
        events::list_own_events,
        events::create_event,
        events::get_own_event,
        events::update_own_event,
        events::list_event_requests,
        events::update_event_requests,
        events::search_events,
        events::get_event,
        events::search_events_admin,
        events::update_event_admin,
        // Requests
        requests::list_own_requests,
        requests::create_request,
        requests::cancel_request,
        // Compilations
        compilations::create_compilation,
        compilations::update_compilation,
        compilations::delete_compilation,
        compilations::list_compilations,
        compilations::get_compilation,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserShortDto,
            crate::models::user::NewUserRequest,
            // Categories
            crate::models::category::Category,
            crate::models::category::NewCategoryDto,
            // Locations
            crate::models::location::LocationDto,
            // Events
            crate::models::event::EventState,
            crate::models::event::EventFullDto,
            crate::models::event::EventShortDto,
            crate::models::event::NewEventDto,
            crate::models::event::UpdateEventUserRequest,
            crate::models::event::UpdateEventAdminRequest,
            crate::models::event::UserStateAction,
            crate::models::event::AdminStateAction,
            // Requests
            crate::models::request::RequestStatus,
            crate::models::request::ParticipationRequestDto,
            crate::models::request::EventRequestStatusUpdateRequest,
            crate::models::request::EventRequestStatusUpdateResult,
            // Compilations
            crate::models::compilation::CompilationDto,
            crate::models::compilation::NewCompilationDto,
            crate::models::compilation::UpdateCompilationRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "events", description = "Public event search"),
        (name = "categories", description = "Public category browsing"),
        (name = "compilations", description = "Public compilation browsing"),
        (name = "private: events", description = "Event management by the initiator"),
        (name = "private: requests", description = "Participation request management"),
        (name = "admin: users", description = "User administration"),
        (name = "admin: categories", description = "Category administration"),
        (name = "admin: events", description = "Event moderation"),
        (name = "admin: compilations", description = "Compilation administration")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gather Stats API",
        version = "1.0.0",
        description = "Endpoint hit collection and view statistics"
    ),
    paths(
        health::health_check,
        health::readiness_check,
        stats::record_hit,
        stats::get_stats,
    ),
    components(
        schemas(
            crate::models::stats::EndpointHit,
            crate::models::stats::ViewStats,
            health::HealthResponse,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "stats", description = "Hit log and view statistics")
    )
)]
pub struct StatsApiDoc;

/// Create the OpenAPI documentation router for the main API
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create the OpenAPI documentation router for the stats service
pub fn create_stats_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", StatsApiDoc::openapi()))
}
