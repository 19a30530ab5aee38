use crate::db::models::{DashboardStats, DbComponent, DbTheme, DbUser};
use crate::db::patch::{
    ComponentCreate, ComponentFilter, ComponentPatch, SearchFilter, ThemeCreate, ThemePatch,
    UserCreate,
};
use crate::db::schema::SQLITE_INIT;
use crate::db::{accounts, components, themes};
use crate::error::AtelierError;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tokio::sync::broadcast;
use tracing::{debug, info};

type Reply<T> = RpcReplyPort<Result<T, AtelierError>>;

/// Emitted after every committed change to the `themes` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    Created(i64),
    Updated(i64),
    Activated(i64),
    Deleted(i64),
}

const THEME_EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
pub enum DbActorMessage {
    ListThemes(Reply<Vec<DbTheme>>),
    GetTheme(i64, Reply<DbTheme>),
    GetThemeByValue(String, Reply<DbTheme>),
    GetActiveTheme(Reply<Option<DbTheme>>),
    CreateTheme(ThemeCreate, Reply<DbTheme>),
    UpdateTheme(i64, ThemePatch, Reply<DbTheme>),
    /// Clear every other active flag and set the target, in one transaction.
    ActivateTheme(i64, Reply<DbTheme>),
    DeleteTheme(i64, Reply<()>),

    ListComponents(ComponentFilter, Reply<Vec<DbComponent>>),
    SearchComponents(SearchFilter, Reply<Vec<DbComponent>>),
    GetComponent(i64, Reply<DbComponent>),
    GetComponentBySlug(String, Reply<DbComponent>),
    CreateComponent(ComponentCreate, Reply<DbComponent>),
    UpsertComponent(ComponentCreate, Reply<DbComponent>),
    UpdateComponent(i64, ComponentPatch, Reply<DbComponent>),
    DeleteComponent(i64, Reply<()>),
    /// One-time variant casing migration; replies with the number of rows rewritten.
    NormalizeComponentVariants(Reply<u64>),

    GetAdminPasswordHash(Reply<Option<String>>),
    SetAdminPasswordHash(String, Reply<()>),
    UpsertUser(UserCreate, Reply<DbUser>),
    GetUserByEmail(String, Reply<Option<DbUser>>),
    GetUser(i64, Reply<Option<DbUser>>),

    DashboardStats(Reply<DashboardStats>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
    theme_events: broadcast::Sender<ThemeEvent>,
}

fn rpc_failed(op: &str, e: impl std::fmt::Display) -> AtelierError {
    AtelierError::RactorError(format!("DbActor {op} RPC failed: {e}"))
}

impl DbActorHandle {
    /// Receiver for theme mutations committed after this call.
    pub fn subscribe_theme_events(&self) -> broadcast::Receiver<ThemeEvent> {
        self.theme_events.subscribe()
    }

    fn notify(&self, event: ThemeEvent) {
        // No receivers is the common case.
        let receivers = self.theme_events.send(event).unwrap_or(0);
        debug!(?event, receivers, "theme event broadcast");
    }

    pub async fn list_themes(&self) -> Result<Vec<DbTheme>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::ListThemes)
            .map_err(|e| rpc_failed("ListThemes", e))?
    }

    pub async fn get_theme(&self, id: i64) -> Result<DbTheme, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetTheme, id)
            .map_err(|e| rpc_failed("GetTheme", e))?
    }

    pub async fn get_theme_by_value(&self, value: &str) -> Result<DbTheme, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetThemeByValue, value.to_string())
            .map_err(|e| rpc_failed("GetThemeByValue", e))?
    }

    pub async fn get_active_theme(&self) -> Result<Option<DbTheme>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetActiveTheme)
            .map_err(|e| rpc_failed("GetActiveTheme", e))?
    }

    pub async fn create_theme(&self, create: ThemeCreate) -> Result<DbTheme, AtelierError> {
        let theme = ractor::call!(self.actor, DbActorMessage::CreateTheme, create)
            .map_err(|e| rpc_failed("CreateTheme", e))??;
        self.notify(ThemeEvent::Created(theme.id));
        Ok(theme)
    }

    pub async fn update_theme(&self, id: i64, patch: ThemePatch) -> Result<DbTheme, AtelierError> {
        let theme = ractor::call!(self.actor, DbActorMessage::UpdateTheme, id, patch)
            .map_err(|e| rpc_failed("UpdateTheme", e))??;
        self.notify(ThemeEvent::Updated(theme.id));
        Ok(theme)
    }

    pub async fn activate_theme(&self, id: i64) -> Result<DbTheme, AtelierError> {
        let theme = ractor::call!(self.actor, DbActorMessage::ActivateTheme, id)
            .map_err(|e| rpc_failed("ActivateTheme", e))??;
        self.notify(ThemeEvent::Activated(theme.id));
        Ok(theme)
    }

    pub async fn delete_theme(&self, id: i64) -> Result<(), AtelierError> {
        ractor::call!(self.actor, DbActorMessage::DeleteTheme, id)
            .map_err(|e| rpc_failed("DeleteTheme", e))??;
        self.notify(ThemeEvent::Deleted(id));
        Ok(())
    }

    pub async fn list_components(
        &self,
        filter: ComponentFilter,
    ) -> Result<Vec<DbComponent>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::ListComponents, filter)
            .map_err(|e| rpc_failed("ListComponents", e))?
    }

    pub async fn search_components(
        &self,
        filter: SearchFilter,
    ) -> Result<Vec<DbComponent>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::SearchComponents, filter)
            .map_err(|e| rpc_failed("SearchComponents", e))?
    }

    pub async fn get_component(&self, id: i64) -> Result<DbComponent, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetComponent, id)
            .map_err(|e| rpc_failed("GetComponent", e))?
    }

    pub async fn get_component_by_slug(&self, slug: &str) -> Result<DbComponent, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetComponentBySlug, slug.to_string())
            .map_err(|e| rpc_failed("GetComponentBySlug", e))?
    }

    pub async fn create_component(
        &self,
        create: ComponentCreate,
    ) -> Result<DbComponent, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::CreateComponent, create)
            .map_err(|e| rpc_failed("CreateComponent", e))?
    }

    pub async fn upsert_component(
        &self,
        create: ComponentCreate,
    ) -> Result<DbComponent, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::UpsertComponent, create)
            .map_err(|e| rpc_failed("UpsertComponent", e))?
    }

    pub async fn update_component(
        &self,
        id: i64,
        patch: ComponentPatch,
    ) -> Result<DbComponent, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::UpdateComponent, id, patch)
            .map_err(|e| rpc_failed("UpdateComponent", e))?
    }

    pub async fn delete_component(&self, id: i64) -> Result<(), AtelierError> {
        ractor::call!(self.actor, DbActorMessage::DeleteComponent, id)
            .map_err(|e| rpc_failed("DeleteComponent", e))?
    }

    pub async fn normalize_component_variants(&self) -> Result<u64, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::NormalizeComponentVariants)
            .map_err(|e| rpc_failed("NormalizeComponentVariants", e))?
    }

    pub async fn get_admin_password_hash(&self) -> Result<Option<String>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetAdminPasswordHash)
            .map_err(|e| rpc_failed("GetAdminPasswordHash", e))?
    }

    pub async fn set_admin_password_hash(&self, hash: String) -> Result<(), AtelierError> {
        ractor::call!(self.actor, DbActorMessage::SetAdminPasswordHash, hash)
            .map_err(|e| rpc_failed("SetAdminPasswordHash", e))?
    }

    pub async fn upsert_user(&self, user: UserCreate) -> Result<DbUser, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::UpsertUser, user)
            .map_err(|e| rpc_failed("UpsertUser", e))?
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetUserByEmail, email.to_string())
            .map_err(|e| rpc_failed("GetUserByEmail", e))?
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<DbUser>, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::GetUser, id)
            .map_err(|e| rpc_failed("GetUser", e))?
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AtelierError> {
        ractor::call!(self.actor, DbActorMessage::DashboardStats)
            .map_err(|e| rpc_failed("DashboardStats", e))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!(database_url = %database_url, "DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::ListThemes(reply) => {
                let _ = reply.send(themes::list(pool).await);
            }
            DbActorMessage::GetTheme(id, reply) => {
                let _ = reply.send(themes::get(pool, id).await);
            }
            DbActorMessage::GetThemeByValue(value, reply) => {
                let _ = reply.send(themes::get_by_value(pool, &value).await);
            }
            DbActorMessage::GetActiveTheme(reply) => {
                let _ = reply.send(themes::get_active(pool).await);
            }
            DbActorMessage::CreateTheme(create, reply) => {
                let _ = reply.send(themes::create(pool, create).await);
            }
            DbActorMessage::UpdateTheme(id, patch, reply) => {
                let _ = reply.send(themes::update(pool, id, patch).await);
            }
            DbActorMessage::ActivateTheme(id, reply) => {
                let _ = reply.send(themes::activate(pool, id).await);
            }
            DbActorMessage::DeleteTheme(id, reply) => {
                let _ = reply.send(themes::delete(pool, id).await);
            }

            DbActorMessage::ListComponents(filter, reply) => {
                let _ = reply.send(components::list(pool, filter).await);
            }
            DbActorMessage::SearchComponents(filter, reply) => {
                let _ = reply.send(components::search(pool, filter).await);
            }
            DbActorMessage::GetComponent(id, reply) => {
                let _ = reply.send(components::get(pool, id).await);
            }
            DbActorMessage::GetComponentBySlug(slug, reply) => {
                let _ = reply.send(components::get_by_slug(pool, &slug).await);
            }
            DbActorMessage::CreateComponent(create, reply) => {
                let _ = reply.send(components::create(pool, create).await);
            }
            DbActorMessage::UpsertComponent(create, reply) => {
                let _ = reply.send(components::upsert(pool, create).await);
            }
            DbActorMessage::UpdateComponent(id, patch, reply) => {
                let _ = reply.send(components::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteComponent(id, reply) => {
                let _ = reply.send(components::delete(pool, id).await);
            }
            DbActorMessage::NormalizeComponentVariants(reply) => {
                let _ = reply.send(components::normalize_variants_all(pool).await);
            }

            DbActorMessage::GetAdminPasswordHash(reply) => {
                let _ = reply.send(accounts::admin_password_hash(pool).await);
            }
            DbActorMessage::SetAdminPasswordHash(hash, reply) => {
                let _ = reply.send(accounts::set_admin_password_hash(pool, hash).await);
            }
            DbActorMessage::UpsertUser(user, reply) => {
                let _ = reply.send(accounts::upsert_user(pool, user).await);
            }
            DbActorMessage::GetUserByEmail(email, reply) => {
                let _ = reply.send(accounts::user_by_email(pool, &email).await);
            }
            DbActorMessage::GetUser(id, reply) => {
                let _ = reply.send(accounts::user_by_id(pool, id).await);
            }

            DbActorMessage::DashboardStats(reply) => {
                let _ = reply.send(accounts::dashboard_stats(pool).await);
            }
        }
        Ok(())
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, AtelierError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| AtelierError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    let (theme_events, _) = broadcast::channel(THEME_EVENT_CAPACITY);
    Ok(DbActorHandle {
        actor,
        theme_events,
    })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), AtelierError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
