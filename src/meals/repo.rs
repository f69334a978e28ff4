use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use uuid::Uuid;

use crate::session::SessionId;

/// Matches the migration default so text ordering and time ordering agree.
const CREATED_AT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub in_diet: bool,
}

/// All meals of a session, oldest first. Ties on `created_at` keep insertion order.
pub async fn list_by_session(db: &SqlitePool, session: &SessionId) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, session_id, description, created_at, in_diet
          FROM meals
         WHERE session_id = $1
         ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(session.as_str())
    .fetch_all(db)
    .await
    .context("list meals by session")?;
    Ok(rows)
}

pub async fn find_by_session(
    db: &SqlitePool,
    session: &SessionId,
    meal_id: Uuid,
) -> anyhow::Result<Option<Meal>> {
    let row = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, session_id, description, created_at, in_diet
          FROM meals
         WHERE id = $1 AND session_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(session.as_str())
    .fetch_optional(db)
    .await
    .context("find meal by session")?;
    Ok(row)
}

pub async fn insert(
    db: &SqlitePool,
    session: &SessionId,
    description: &str,
    in_diet: bool,
) -> anyhow::Result<Meal> {
    let meal_id = Uuid::new_v4();
    let created_at = OffsetDateTime::now_utc()
        .format(CREATED_AT_FORMAT)
        .context("format created_at")?;

    let meal = sqlx::query_as::<_, Meal>(
        r#"
        INSERT INTO meals (id, session_id, description, created_at, in_diet)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, session_id, description, created_at, in_diet
        "#,
    )
    .bind(meal_id)
    .bind(session.as_str())
    .bind(description)
    .bind(created_at)
    .bind(in_diet)
    .fetch_one(db)
    .await
    .context("insert meal")?;
    Ok(meal)
}

/// Returns `false` when no meal with that id belongs to the session.
pub async fn update_by_session(
    db: &SqlitePool,
    session: &SessionId,
    meal_id: Uuid,
    description: &str,
    in_diet: bool,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE meals
           SET description = $1, in_diet = $2
         WHERE id = $3 AND session_id = $4
        "#,
    )
    .bind(description)
    .bind(in_diet)
    .bind(meal_id)
    .bind(session.as_str())
    .execute(db)
    .await
    .context("update meal")?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` when no meal with that id belongs to the session.
pub async fn delete_by_session(
    db: &SqlitePool,
    session: &SessionId,
    meal_id: Uuid,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM meals
         WHERE id = $1 AND session_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(session.as_str())
    .execute(db)
    .await
    .context("delete meal")?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn session(raw: &str) -> SessionId {
        SessionId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let state = AppState::in_memory().await;
        let s = session("s1");

        let meal = insert(&state.db, &s, "oatmeal", true).await.unwrap();
        assert_eq!(meal.session_id.as_deref(), Some("s1"));
        assert_eq!(meal.description, "oatmeal");
        assert!(meal.in_diet);
        assert!(!meal.id.is_nil());

        let other = insert(&state.db, &s, "salad", true).await.unwrap();
        assert_ne!(meal.id, other.id);
    }

    #[tokio::test]
    async fn list_is_scoped_and_in_creation_order() {
        let state = AppState::in_memory().await;
        let (a, b) = (session("a"), session("b"));

        let first = insert(&state.db, &a, "first", true).await.unwrap();
        insert(&state.db, &b, "foreign", false).await.unwrap();
        let second = insert(&state.db, &a, "second", false).await.unwrap();
        let third = insert(&state.db, &a, "third", true).await.unwrap();

        let ids: Vec<Uuid> = list_by_session(&state.db, &a)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);

        assert!(list_by_session(&state.db, &session("nobody"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let state = AppState::in_memory().await;
        let s = session("tied");

        let mut inserted = Vec::new();
        for i in 0..5 {
            let id = Uuid::new_v4();
            sqlx::query(
                r#"
                INSERT INTO meals (id, session_id, description, created_at, in_diet)
                VALUES ($1, $2, $3, '2024-01-01T00:00:00.000Z', $4)
                "#,
            )
            .bind(id)
            .bind(s.as_str())
            .bind(format!("meal {i}"))
            .bind(i % 2 == 0)
            .execute(&state.db)
            .await
            .unwrap();
            inserted.push(id);
        }

        let ids: Vec<Uuid> = list_by_session(&state.db, &s)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, inserted);
    }

    #[tokio::test]
    async fn foreign_meal_looks_like_missing_meal() {
        let state = AppState::in_memory().await;
        let (owner, intruder) = (session("owner"), session("intruder"));
        let meal = insert(&state.db, &owner, "toast", true).await.unwrap();

        assert!(find_by_session(&state.db, &intruder, meal.id).await.unwrap().is_none());
        assert!(find_by_session(&state.db, &intruder, Uuid::new_v4()).await.unwrap().is_none());

        assert!(!update_by_session(&state.db, &intruder, meal.id, "hacked", false).await.unwrap());
        assert!(!delete_by_session(&state.db, &intruder, meal.id).await.unwrap());

        let unchanged = find_by_session(&state.db, &owner, meal.id).await.unwrap().unwrap();
        assert_eq!(unchanged.description, "toast");
        assert!(unchanged.in_diet);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_timestamp() {
        let state = AppState::in_memory().await;
        let s = session("s");
        let meal = insert(&state.db, &s, "pizza", false).await.unwrap();

        assert!(update_by_session(&state.db, &s, meal.id, "salad", true).await.unwrap());

        let updated = find_by_session(&state.db, &s, meal.id).await.unwrap().unwrap();
        assert_eq!(updated.id, meal.id);
        assert_eq!(updated.session_id, meal.session_id);
        assert_eq!(updated.created_at, meal.created_at);
        assert_eq!(updated.description, "salad");
        assert!(updated.in_diet);
    }

    #[tokio::test]
    async fn delete_removes_permanently() {
        let state = AppState::in_memory().await;
        let s = session("s");
        let meal = insert(&state.db, &s, "cake", false).await.unwrap();

        assert!(delete_by_session(&state.db, &s, meal.id).await.unwrap());
        assert!(find_by_session(&state.db, &s, meal.id).await.unwrap().is_none());
        assert!(!delete_by_session(&state.db, &s, meal.id).await.unwrap());
    }
}
