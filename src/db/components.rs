use atelier_schema::normalize_variants;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use super::models::DbComponent;
use super::patch::{ComponentCreate, ComponentFilter, ComponentPatch, SearchFilter};
use super::unique_violation_as_conflict;
use crate::error::AtelierError;

const COLUMNS: &str = "id, name, slug, description, category, code, props, variants, prompts, examples, installation, created_at, updated_at";
const SLUG_TAKEN: &str = "A component with this slug already exists";

/// Read filters compare the raw value; an unknown category simply matches nothing.
fn category_filter(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn select(builder: &mut QueryBuilder<'_, Sqlite>) {
    builder.push("SELECT ").push(COLUMNS).push(" FROM components");
}

pub(super) async fn list(
    pool: &SqlitePool,
    filter: ComponentFilter,
) -> Result<Vec<DbComponent>, AtelierError> {
    let mut builder = QueryBuilder::<Sqlite>::new("");
    select(&mut builder);
    if let Some(category) = category_filter(filter.category.as_deref()) {
        builder.push(" WHERE category = ").push_bind(category.to_string());
    }
    builder
        .push(" ORDER BY name ASC, id ASC LIMIT ")
        .push_bind(i64::from(filter.limit));

    let rows = builder
        .build_query_as::<DbComponent>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Case-insensitive substring match over name, description and category.
///
/// SQLite's `lower()` only folds ASCII, so rows are folded here with the same
/// Unicode lowercasing as the query.
pub(super) async fn search(
    pool: &SqlitePool,
    filter: SearchFilter,
) -> Result<Vec<DbComponent>, AtelierError> {
    let needle = filter.query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AtelierError::BadRequest(
            "Query parameter \"q\" is required".to_string(),
        ));
    }

    let mut builder = QueryBuilder::<Sqlite>::new("");
    select(&mut builder);
    if let Some(category) = category_filter(filter.category.as_deref()) {
        builder.push(" WHERE category = ").push_bind(category.to_string());
    }
    builder.push(" ORDER BY name ASC, id ASC");

    let rows = builder
        .build_query_as::<DbComponent>()
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .filter(|row| matches_needle(row, &needle))
        .take(filter.limit as usize)
        .collect())
}

fn matches_needle(row: &DbComponent, needle: &str) -> bool {
    [&row.name, &row.description, &row.category]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

pub(super) async fn get(pool: &SqlitePool, id: i64) -> Result<DbComponent, AtelierError> {
    sqlx::query_as::<_, DbComponent>(&format!("SELECT {COLUMNS} FROM components WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AtelierError::NotFound("Component not found"))
}

pub(super) async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<DbComponent, AtelierError> {
    sqlx::query_as::<_, DbComponent>(&format!("SELECT {COLUMNS} FROM components WHERE slug = ?"))
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or(AtelierError::NotFound("Component not found"))
}

pub(super) async fn create(
    pool: &SqlitePool,
    create: ComponentCreate,
) -> Result<DbComponent, AtelierError> {
    let slug = create.slug();
    let now = Utc::now();
    let row = sqlx::query_as::<_, DbComponent>(&format!(
        r#"
        INSERT INTO components (
            name, slug, description, category, code, props, variants, prompts, examples, installation,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(create.name)
    .bind(slug)
    .bind(create.description)
    .bind(create.category.as_str())
    .bind(create.code)
    .bind(Json(create.props))
    .bind(Json(create.variants))
    .bind(Json(create.prompts))
    .bind(Json(create.examples))
    .bind(Json(create.installation))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_violation_as_conflict(e, SLUG_TAKEN))?;
    Ok(row)
}

/// Insert or replace the component with the same slug, keeping its id and `created_at`.
pub(super) async fn upsert(
    pool: &SqlitePool,
    create: ComponentCreate,
) -> Result<DbComponent, AtelierError> {
    let slug = create.slug();
    let now = Utc::now();
    let row = sqlx::query_as::<_, DbComponent>(&format!(
        r#"
        INSERT INTO components (
            name, slug, description, category, code, props, variants, prompts, examples, installation,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(slug) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            category = excluded.category,
            code = excluded.code,
            props = excluded.props,
            variants = excluded.variants,
            prompts = excluded.prompts,
            examples = excluded.examples,
            installation = excluded.installation,
            updated_at = excluded.updated_at
        RETURNING {COLUMNS}
        "#
    ))
    .bind(create.name)
    .bind(slug)
    .bind(create.description)
    .bind(create.category.as_str())
    .bind(create.code)
    .bind(Json(create.props))
    .bind(Json(create.variants))
    .bind(Json(create.prompts))
    .bind(Json(create.examples))
    .bind(Json(create.installation))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub(super) async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: ComponentPatch,
) -> Result<DbComponent, AtelierError> {
    let row = sqlx::query_as::<_, DbComponent>(&format!(
        r#"
        UPDATE components
        SET
            name = COALESCE(?, name),
            slug = COALESCE(?, slug),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            code = COALESCE(?, code),
            props = COALESCE(?, props),
            variants = COALESCE(?, variants),
            prompts = COALESCE(?, prompts),
            examples = COALESCE(?, examples),
            installation = COALESCE(?, installation),
            updated_at = ?
        WHERE id = ?
        RETURNING {COLUMNS}
        "#
    ))
    .bind(patch.name)
    .bind(patch.slug)
    .bind(patch.description)
    .bind(patch.category.map(|c| c.as_str()))
    .bind(patch.code)
    .bind(patch.props.map(Json))
    .bind(patch.variants.map(Json))
    .bind(patch.prompts.map(Json))
    .bind(patch.examples.map(Json))
    .bind(patch.installation.map(Json))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| unique_violation_as_conflict(e, SLUG_TAKEN))?;

    row.ok_or(AtelierError::NotFound("Component not found"))
}

pub(super) async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AtelierError> {
    let res = sqlx::query("DELETE FROM components WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(AtelierError::NotFound("Component not found"));
    }
    Ok(())
}

/// Rewrites every component whose variant map is not already in canonical
/// lowercase form. Returns the number of rows changed.
pub(super) async fn normalize_variants_all(pool: &SqlitePool) -> Result<u64, AtelierError> {
    let rows = sqlx::query_as::<_, DbComponent>(&format!("SELECT {COLUMNS} FROM components ORDER BY id"))
        .fetch_all(pool)
        .await?;

    let mut tx = pool.begin().await?;
    let mut changed = 0;
    for row in rows {
        let normalized = normalize_variants(&row.variants.0);
        if normalized == row.variants.0 {
            continue;
        }
        sqlx::query("UPDATE components SET variants = ?, updated_at = ? WHERE id = ?")
            .bind(Json(normalized))
            .bind(Utc::now())
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        info!(component = %row.slug, "normalized variant casing");
        changed += 1;
    }
    tx.commit().await?;
    Ok(changed)
}

pub(super) async fn count_by_category(
    pool: &SqlitePool,
) -> Result<Vec<(String, i64)>, AtelierError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM components GROUP BY category ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
