//! Theme queries. Every multi-statement write runs in one transaction so the
//! single-active invariant holds even if a statement fails half-way.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::models::DbTheme;
use super::patch::{ThemeCreate, ThemePatch};
use super::unique_violation_as_conflict;
use crate::error::AtelierError;

macro_rules! select_themes {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, value, colors, typography, spacing, effects, is_active, created_at, updated_at FROM themes ",
            $tail
        )
    };
}

pub(super) async fn list(pool: &SqlitePool) -> Result<Vec<DbTheme>, AtelierError> {
    let rows = sqlx::query_as::<_, DbTheme>(select_themes!("ORDER BY name ASC, id ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub(super) async fn get(pool: &SqlitePool, id: i64) -> Result<DbTheme, AtelierError> {
    sqlx::query_as::<_, DbTheme>(select_themes!("WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AtelierError::NotFound("Theme not found"))
}

pub(super) async fn get_by_value(pool: &SqlitePool, value: &str) -> Result<DbTheme, AtelierError> {
    sqlx::query_as::<_, DbTheme>(select_themes!("WHERE value = ?"))
        .bind(value)
        .fetch_optional(pool)
        .await?
        .ok_or(AtelierError::NotFound("Theme not found"))
}

pub(super) async fn get_active(pool: &SqlitePool) -> Result<Option<DbTheme>, AtelierError> {
    let row = sqlx::query_as::<_, DbTheme>(select_themes!("WHERE is_active = 1"))
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn deactivate_others(
    tx: &mut Transaction<'_, Sqlite>,
    keep_id: Option<i64>,
) -> Result<u64, AtelierError> {
    let res = sqlx::query(
        r#"
        UPDATE themes
        SET is_active = 0, updated_at = ?
        WHERE is_active = 1 AND (? IS NULL OR id <> ?)
        "#,
    )
    .bind(Utc::now())
    .bind(keep_id)
    .bind(keep_id)
    .execute(&mut **tx)
    .await?;
    Ok(res.rows_affected())
}

async fn fetch_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> Result<Option<DbTheme>, AtelierError> {
    let row = sqlx::query_as::<_, DbTheme>(select_themes!("WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

pub(super) async fn create(pool: &SqlitePool, create: ThemeCreate) -> Result<DbTheme, AtelierError> {
    let mut tx = pool.begin().await?;
    if create.is_active {
        deactivate_others(&mut tx, None).await?;
    }

    let now = Utc::now();
    let row = sqlx::query_as::<_, DbTheme>(
        r#"
        INSERT INTO themes (
            name, value, colors, typography, spacing, effects, is_active, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, name, value, colors, typography, spacing, effects, is_active, created_at, updated_at
        "#,
    )
    .bind(create.name)
    .bind(create.value)
    .bind(Json(create.colors))
    .bind(create.typography.map(Json))
    .bind(create.spacing.map(Json))
    .bind(create.effects.map(Json))
    .bind(create.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| unique_violation_as_conflict(e, "A theme with this value already exists"))?;

    tx.commit().await?;
    Ok(row)
}

pub(super) async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: ThemePatch,
) -> Result<DbTheme, AtelierError> {
    let mut tx = pool.begin().await?;
    if fetch_in_tx(&mut tx, id).await?.is_none() {
        return Err(AtelierError::NotFound("Theme not found"));
    }
    if patch.is_active == Some(true) {
        deactivate_others(&mut tx, Some(id)).await?;
    }

    sqlx::query(
        r#"
        UPDATE themes
        SET
            name = COALESCE(?, name),
            value = COALESCE(?, value),
            colors = COALESCE(?, colors),
            typography = COALESCE(?, typography),
            spacing = COALESCE(?, spacing),
            effects = COALESCE(?, effects),
            is_active = COALESCE(?, is_active),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(patch.name)
    .bind(patch.value)
    .bind(patch.colors.map(Json))
    .bind(patch.typography.map(Json))
    .bind(patch.spacing.map(Json))
    .bind(patch.effects.map(Json))
    .bind(patch.is_active)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| unique_violation_as_conflict(e, "A theme with this value already exists"))?;

    let row = fetch_in_tx(&mut tx, id)
        .await?
        .ok_or(AtelierError::NotFound("Theme not found"))?;
    tx.commit().await?;
    Ok(row)
}

/// Makes `id` the only active theme. A missing target leaves the current active theme alone.
pub(super) async fn activate(pool: &SqlitePool, id: i64) -> Result<DbTheme, AtelierError> {
    let mut tx = pool.begin().await?;
    if fetch_in_tx(&mut tx, id).await?.is_none() {
        return Err(AtelierError::NotFound("Theme not found"));
    }
    deactivate_others(&mut tx, Some(id)).await?;
    sqlx::query("UPDATE themes SET is_active = 1, updated_at = ? WHERE id = ? AND is_active = 0")
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let row = fetch_in_tx(&mut tx, id)
        .await?
        .ok_or(AtelierError::NotFound("Theme not found"))?;
    tx.commit().await?;
    Ok(row)
}

pub(super) async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AtelierError> {
    let mut tx = pool.begin().await?;
    let is_active: Option<bool> = sqlx::query_scalar("SELECT is_active FROM themes WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    match is_active {
        None => return Err(AtelierError::NotFound("Theme not found")),
        Some(true) => return Err(AtelierError::ActiveThemeDeletion),
        Some(false) => {}
    }

    sqlx::query("DELETE FROM themes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
