use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected
        .merge(
            Router::new()
                .merge(user_routes())
                .merge(profile_routes())
                .merge(education_routes())
                .merge(assessment_routes())
                .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        )
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::register))
        .route("/auth/login", post(public::login))
        .route("/auth/logout", post(public::logout))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users", get(users::list))
        .route("/users/", get(users::list))
        .route("/users/me", get(users::me))
        .route("/users/:user_id", get(users::show))
}

fn profile_routes() -> Router<AppState> {
    use protected::profile;

    Router::new()
        .route(
            "/students/:user_id/profile",
            get(profile::show).post(profile::create).put(profile::update),
        )
        .route("/students/:user_id/profile/submit", post(profile::submit))
        .route("/students/:user_id/profile/progress", get(profile::progress))
}

fn education_routes() -> Router<AppState> {
    use protected::education;

    Router::new()
        .route(
            "/students/:user_id/education",
            get(education::list).post(education::create),
        )
        .route(
            "/students/:user_id/education/:education_id",
            get(education::show)
                .put(education::update)
                .delete(education::delete),
        )
}

fn assessment_routes() -> Router<AppState> {
    use protected::assessment;

    Router::new()
        .route("/students/:user_id/assessment/available", get(assessment::available))
        .route(
            "/students/:user_id/assessment/start/:assessment_id",
            get(assessment::start),
        )
        .route(
            "/students/:user_id/assessment/submit/:assessment_id",
            post(assessment::submit),
        )
        .route(
            "/students/:user_id/assessment/report/:submission_id",
            get(assessment::report),
        )
        .route("/students/:user_id/assessment/history", get(assessment::history))
        .route(
            "/students/:user_id/assessment/status/:assessment_id",
            get(assessment::status),
        )
}

/// `*` anywhere in the list allows every origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}
