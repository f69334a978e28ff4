use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{meal_id, validated_body, MealPayload},
    metrics::DietReport,
    repo::Meal,
    services,
};
use crate::{
    error::AppError,
    session::{session_cookie, OptionalSession, RequiredSession, SessionId},
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/metrics", get(get_metrics))
        .route("/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    RequiredSession(session): RequiredSession,
) -> Result<Json<Vec<Meal>>, AppError> {
    let meals = services::list_meals(&state.db, &session).await?;
    Ok(Json(meals))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    RequiredSession(session): RequiredSession,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Meal>, AppError> {
    let id = meal_id(path)?;
    let meal = services::get_meal(&state.db, &session, id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    RequiredSession(session): RequiredSession,
) -> Result<Json<DietReport>, AppError> {
    let report = services::diet_report(&state.db, &session).await?;
    Ok(Json(report))
}

/// The only operation open to clients without a session: one is issued on the spot.
#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    body: Result<Json<MealPayload>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Meal>), AppError> {
    let input = validated_body(body)?;

    let mut headers = HeaderMap::new();
    let session = match session {
        Some(existing) => existing,
        None => {
            let issued = SessionId::generate();
            let cfg = &state.config.session;
            let cookie = session_cookie(&cfg.cookie_name, &issued, cfg.ttl_days)
                .context("build session cookie")?;
            headers.insert(header::SET_COOKIE, cookie);
            info!(session = %issued, "issued new session");
            issued
        }
    };

    let meal = services::create_meal(&state.db, &session, &input).await?;

    let location = HeaderValue::from_str(&format!("/meals/{}", meal.id))
        .context("build location header")?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(meal)))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    RequiredSession(session): RequiredSession,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<MealPayload>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = meal_id(path)?;
    let input = validated_body(body)?;
    services::update_meal(&state.db, &session, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    RequiredSession(session): RequiredSession,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = meal_id(path)?;
    services::delete_meal(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
