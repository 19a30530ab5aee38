use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use super::components::count_by_category;
use super::models::{DashboardStats, DbUser};
use super::patch::UserCreate;
use crate::error::AtelierError;

pub(super) async fn admin_password_hash(pool: &SqlitePool) -> Result<Option<String>, AtelierError> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM admin_config WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub(super) async fn set_admin_password_hash(
    pool: &SqlitePool,
    hash: String,
) -> Result<(), AtelierError> {
    sqlx::query(
        r#"
        INSERT INTO admin_config (id, password_hash, updated_at)
        VALUES (1, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            password_hash = excluded.password_hash,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub(super) async fn upsert_user(pool: &SqlitePool, user: UserCreate) -> Result<DbUser, AtelierError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (email, password_hash, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            password_hash = excluded.password_hash,
            role = excluded.role,
            updated_at = excluded.updated_at
        RETURNING id, email, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub(super) async fn user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<DbUser>, AtelierError> {
    let row = sqlx::query_as::<_, DbUser>(
        "SELECT id, email, password_hash, role, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub(super) async fn user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<DbUser>, AtelierError> {
    let row = sqlx::query_as::<_, DbUser>(
        "SELECT id, email, password_hash, role, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub(super) async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, AtelierError> {
    let themes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM themes")
        .fetch_one(pool)
        .await?;
    let components: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM components")
        .fetch_one(pool)
        .await?;
    let active_theme: Option<String> =
        sqlx::query_scalar("SELECT value FROM themes WHERE is_active = 1")
            .fetch_optional(pool)
            .await?;
    let by_category: BTreeMap<String, i64> = count_by_category(pool).await?.into_iter().collect();

    Ok(DashboardStats {
        themes,
        components,
        active_theme,
        by_category,
    })
}
