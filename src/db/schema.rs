//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `themes` table (one row per theme, at most one with is_active = 1)
/// - `components` table (one row per component, unique slug)
/// - `users` table (editor/admin accounts)
/// - `admin_config` table (single row holding the shared admin password hash)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Themes
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS themes (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL UNIQUE,
    colors TEXT NOT NULL DEFAULT '{}', -- JSON object token -> colour
    typography TEXT NULL, -- JSON object
    spacing TEXT NULL, -- JSON object
    effects TEXT NULL, -- JSON object
    is_active INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

-- Enforces the single active theme at the storage level.
CREATE UNIQUE INDEX IF NOT EXISTS idx_themes_single_active ON themes(is_active) WHERE is_active = 1;

-- ---------------------------------------------------------------------------
-- Components
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS components (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT 'other',
    code TEXT NOT NULL DEFAULT '',
    props TEXT NOT NULL DEFAULT '{}', -- JSON
    variants TEXT NOT NULL DEFAULT '{}', -- JSON object group -> [option]
    prompts TEXT NOT NULL DEFAULT '{}', -- JSON {basic, advanced, useCases}
    examples TEXT NOT NULL DEFAULT '[]', -- JSON [{name, code}]
    installation TEXT NOT NULL DEFAULT '{}', -- JSON {dependencies, setupSteps}
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_components_category ON components(category);

-- ---------------------------------------------------------------------------
-- Accounts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL, -- argon2 PHC string
    role TEXT NOT NULL CHECK (role IN ('admin', 'editor')),
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS admin_config (
    id INTEGER PRIMARY KEY NOT NULL CHECK (id = 1),
    password_hash TEXT NOT NULL, -- argon2 PHC string
    updated_at TEXT NOT NULL -- RFC3339
);
"#;
