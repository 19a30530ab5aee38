//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `actor.rs`: the `DbActor` owning the pool, and its handle
//! - `themes.rs`, `components.rs`, `accounts.rs`: queries run inside the actor
//! - `models.rs`: Rust structs mirroring DB rows
//! - `patch.rs`: write payloads and list filters
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)

pub mod actor;
pub mod models;
pub mod patch;
pub mod schema;

mod accounts;
mod components;
mod themes;

use crate::error::AtelierError;

pub use actor::{DbActorHandle, ThemeEvent, spawn};
pub use models::{DashboardStats, DbComponent, DbTheme, DbUser};
pub use patch::{
    ComponentCreate, ComponentFilter, ComponentPatch, SearchFilter, ThemeCreate, ThemePatch,
    UserCreate,
};
pub use schema::SQLITE_INIT;

/// Turns a UNIQUE constraint failure into a 409 with `message`.
fn unique_violation_as_conflict(err: sqlx::Error, message: &str) -> AtelierError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AtelierError::Conflict(message.to_string())
        }
        _ => AtelierError::DatabaseError(err),
    }
}
