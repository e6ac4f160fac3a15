// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, courses, profile, quiz, submission},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: signup/login, course catalog, quiz delivery and submission.
/// * Profile routes sit behind `auth_middleware`; the user list additionally
///   requires the admin role.
/// * Applies global middleware (Trace, CORS) and injects `AppState`.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let public_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/courses", get(courses::list_courses))
        .route("/course-videos", get(courses::list_course_videos))
        .route("/quiz/questions", get(quiz::get_questions))
        .route("/quiz-content", get(quiz::get_quiz_content))
        .route("/quiz/submit", post(submission::submit_quiz))
        .route("/quiz/submissions/latest", get(submission::latest_submission))
        .route("/quiz-answers", post(submission::insert_answer))
        .route("/quizzes/nism/ch1/submit", post(submission::submit_nism_ch1));

    let profile_routes = Router::new()
        .route("/edit-profile", put(profile::edit_profile))
        .route("/delete-profile", delete(profile::delete_profile))
        .route("/change-password", put(profile::change_password))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Auth runs first (outermost), then the admin check
    let admin_routes = Router::new()
        .route("/get-all-users", get(profile::list_users))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(profile_routes).merge(admin_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}
