mod dto;
pub mod handlers;
mod metrics;
mod repo;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().nest("/meals", handlers::meal_routes())
}
