use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{auth, donations, events, health, milestones, people, rsvp, surveys, transportation};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/events", get(events::list_upcoming))
        .route("/api/v1/events/:id", get(events::get_event))
        .route("/api/v1/donations", post(donations::record_donation))
        .route(
            "/api/v1/surveys/:occurrence_id/responses",
            post(surveys::submit_response),
        );

    // Participant routes; handlers authenticate via the UserAuth extractor
    let user_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/profile", get(people::get_profile))
        .route("/api/v1/profile", patch(people::update_profile))
        .route("/api/v1/profile/milestones", get(milestones::list_mine))
        .route("/api/v1/events/:id/rsvp", post(rsvp::create_rsvp))
        .route(
            "/api/v1/events/:id/rsvp",
            delete(rsvp::cancel_rsvp),
        )
        .route("/api/v1/registrations/mine", get(rsvp::list_mine));

    // Manager routes; handlers authenticate via the ManagerAuth extractor
    let admin_routes = Router::new()
        .route("/api/v1/admin/people", get(people::list_people))
        .route("/api/v1/admin/people", post(people::create_person))
        .route("/api/v1/admin/people/:person_id", get(people::get_person))
        .route(
            "/api/v1/admin/people/:person_id",
            patch(people::update_person),
        )
        .route(
            "/api/v1/admin/people/:person_id",
            delete(people::delete_person),
        )
        .route(
            "/api/v1/admin/people/:person_id/milestones",
            get(milestones::list_for_person),
        )
        .route(
            "/api/v1/admin/people/:person_id/milestones",
            post(milestones::create_milestone),
        )
        .route(
            "/api/v1/admin/milestones/:milestone_id",
            patch(milestones::update_milestone),
        )
        .route(
            "/api/v1/admin/milestones/:milestone_id",
            delete(milestones::delete_milestone),
        )
        .route("/api/v1/admin/events", post(events::create_event))
        .route("/api/v1/admin/events/:id", patch(events::update_event))
        .route(
            "/api/v1/admin/events/:id",
            delete(events::delete_event),
        )
        .route(
            "/api/v1/admin/events/:id/occurrences",
            post(events::create_occurrence),
        )
        .route(
            "/api/v1/admin/occurrences/:occurrence_id",
            delete(events::delete_occurrence),
        )
        .route(
            "/api/v1/admin/events/:id/transportation",
            get(transportation::get_board),
        )
        .route(
            "/api/v1/admin/events/:id/match",
            post(transportation::create_match),
        )
        .route(
            "/api/v1/admin/registrations/:registration_id/attended",
            post(rsvp::set_attended),
        )
        .route(
            "/api/v1/admin/surveys/:occurrence_id/responses",
            get(surveys::list_responses),
        )
        .route("/api/v1/admin/donations", get(donations::list_donations));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
