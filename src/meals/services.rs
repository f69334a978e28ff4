use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::MealInput,
    metrics::{summarize, DietReport},
    repo::{self, Meal},
};
use crate::{error::AppError, session::SessionId};

pub async fn list_meals(db: &SqlitePool, session: &SessionId) -> Result<Vec<Meal>, AppError> {
    Ok(repo::list_by_session(db, session).await?)
}

pub async fn get_meal(db: &SqlitePool, session: &SessionId, meal_id: Uuid) -> Result<Meal, AppError> {
    repo::find_by_session(db, session, meal_id)
        .await?
        .ok_or_else(|| {
            debug!(%meal_id, "meal not visible to session");
            AppError::NotFound
        })
}

pub async fn create_meal(
    db: &SqlitePool,
    session: &SessionId,
    input: &MealInput,
) -> Result<Meal, AppError> {
    let meal = repo::insert(db, session, input.description(), input.in_diet()).await?;
    info!(meal_id = %meal.id, in_diet = meal.in_diet, "meal created");
    Ok(meal)
}

pub async fn update_meal(
    db: &SqlitePool,
    session: &SessionId,
    meal_id: Uuid,
    input: &MealInput,
) -> Result<(), AppError> {
    if !repo::update_by_session(db, session, meal_id, input.description(), input.in_diet()).await? {
        debug!(%meal_id, "update target not visible to session");
        return Err(AppError::NotFound);
    }
    info!(%meal_id, "meal updated");
    Ok(())
}

pub async fn delete_meal(db: &SqlitePool, session: &SessionId, meal_id: Uuid) -> Result<(), AppError> {
    if !repo::delete_by_session(db, session, meal_id).await? {
        debug!(%meal_id, "delete target not visible to session");
        return Err(AppError::NotFound);
    }
    info!(%meal_id, "meal deleted");
    Ok(())
}

pub async fn diet_report(db: &SqlitePool, session: &SessionId) -> Result<DietReport, AppError> {
    let meals = repo::list_by_session(db, session).await?;
    Ok(summarize(&meals))
}
