use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::Path,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Body of `POST /meals` and `PUT /meals/:id` as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPayload {
    pub description: String,
    pub in_diet: bool,
}

/// A payload that passed validation; the only thing the store accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealInput {
    description: String,
    in_diet: bool,
}

impl MealInput {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn in_diet(&self) -> bool {
        self.in_diet
    }
}

impl MealPayload {
    pub fn validate(self) -> Result<MealInput, AppError> {
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description must not be empty".into()));
        }
        Ok(MealInput {
            description: self.description,
            in_diet: self.in_diet,
        })
    }
}

/// Turns the raw JSON extraction result into validated input.
pub fn validated_body(body: Result<Json<MealPayload>, JsonRejection>) -> Result<MealInput, AppError> {
    let Json(payload) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    payload.validate()
}

pub fn meal_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::Validation("id must be a valid UUID".into()))
}
