use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        activities::{
            activity_history, create_activity, delete_activities, delete_activity, get_activity,
            list_activities, update_activity,
        },
        exercises::{
            create_exercise, delete_exercise, delete_exercises, get_exercise, list_exercises,
            update_exercise,
        },
        health::{healthz, livez},
        maintenance::reconcile,
        workouts::{
            copy_workouts, create_workout, delete_workout, delete_workouts, get_workout,
            list_workouts, update_workout,
        },
    },
    state::AppState,
};

/// Exercise payloads carry base64 images of up to 1 MiB.
const BODY_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // API routes with CORS
    let api_routes = Router::new()
        // Exercise routes
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route("/exercises/delete", post(delete_exercises))
        .route(
            "/exercises/{id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
        // Workout routes
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/delete", post(delete_workouts))
        .route("/workouts/copy", post(copy_workouts))
        .route(
            "/workouts/{id}",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        // Activity routes
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/delete", post(delete_activities))
        .route("/activities/history", get(activity_history))
        .route(
            "/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity),
        )
        .route("/maintenance/reconcile", post(reconcile))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
