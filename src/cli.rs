use clap::{Parser, Subcommand};
use tracing::info;

use crate::auth::{MIN_PASSWORD_CHARS, Role, hash_password_blocking};
use crate::db::{DbActorHandle, UserCreate};
use crate::error::AtelierError;
use crate::seed::{SeedReport, seed};

#[derive(Debug, Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier design-system content service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// No subcommand means `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Hash and store the shared admin password
    SetAdminPassword { password: String },

    /// Create or update a user account
    AddUser {
        email: String,
        /// admin or editor
        role: Role,
        password: String,
    },

    /// Insert starter themes and a sample component into empty tables
    Seed,

    /// Lowercase variant group names and options on every stored component
    NormalizeVariants,
}

/// Outcome of a maintenance subcommand, printed by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AdminPasswordSet,
    UserSaved { email: String, role: Role },
    Seeded(SeedReport),
    VariantsNormalized(u64),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::AdminPasswordSet => write!(f, "Admin password updated"),
            Outcome::UserSaved { email, role } => write!(f, "Saved user {email} ({role})"),
            Outcome::Seeded(report) => write!(
                f,
                "Seeded {} theme(s) and {} component(s)",
                report.themes, report.components
            ),
            Outcome::VariantsNormalized(n) => write!(f, "Normalized variants on {n} component(s)"),
        }
    }
}

fn check_password(password: &str) -> Result<(), AtelierError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AtelierError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Runs every subcommand except `serve`.
pub async fn run_maintenance(
    db: &DbActorHandle,
    command: Command,
) -> Result<Outcome, AtelierError> {
    match command {
        Command::Serve => Err(AtelierError::Internal(
            "serve is not a maintenance command".to_string(),
        )),
        Command::SetAdminPassword { password } => {
            check_password(&password)?;
            let hash = hash_password_blocking(password).await?;
            db.set_admin_password_hash(hash).await?;
            info!("admin password set from cli");
            Ok(Outcome::AdminPasswordSet)
        }
        Command::AddUser {
            email,
            role,
            password,
        } => {
            let email = email.trim().to_string();
            if email.is_empty() || !email.contains('@') {
                return Err(AtelierError::BadRequest(format!(
                    "`{email}` is not an email address"
                )));
            }
            check_password(&password)?;
            let password_hash = hash_password_blocking(password).await?;
            let user = db
                .upsert_user(UserCreate {
                    email,
                    password_hash,
                    role,
                })
                .await?;
            info!(email = %user.email, role = %role, "user saved from cli");
            Ok(Outcome::UserSaved {
                email: user.email,
                role,
            })
        }
        Command::Seed => seed(db).await.map(Outcome::Seeded),
        Command::NormalizeVariants => {
            let n = db.normalize_component_variants().await?;
            info!(updated = n, "variant casing migrated");
            Ok(Outcome::VariantsNormalized(n))
        }
    }
}
