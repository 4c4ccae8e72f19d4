use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/streak", get(handlers::get_streak))
        .route("/api/streak/visit", post(handlers::visit))
        .route("/api/streak/reset", post(handlers::reset))
        .route("/api/streak/week", get(handlers::get_week))
        .route("/api/tiers", get(handlers::get_tiers))
        .route("/api/profile", get(handlers::get_profile).put(handlers::put_profile))
        .route("/api/onboarding/restart", post(handlers::restart))
        .with_state(state)
}
