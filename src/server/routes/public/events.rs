use crate::catalog;
use crate::db::DbActorHandle;
use crate::server::router::AtelierState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt, stream};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

pub const ACTIVE_THEME_EVENT: &str = "active-theme";

async fn active_theme_event(db: &DbActorHandle) -> Event {
    let event = Event::default().event(ACTIVE_THEME_EVENT);
    match catalog::active_theme(db).await {
        Ok(theme) => event.json_data(&theme).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode active theme event");
            Event::default().event(ACTIVE_THEME_EVENT).data("null")
        }),
        Err(e) => Event::default().event("error").data(e.to_string()),
    }
}

/// GET /api/public/active-theme/events
///
/// Sends the active theme on connect and again after every theme change. Lagged receivers
/// just refresh; the receiver is dropped with the connection.
pub async fn active_theme_events(
    State(state): State<AtelierState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let changes = BroadcastStream::new(state.db.subscribe_theme_events()).map(|change| {
        if let Err(e) = &change {
            debug!(error = %e, "theme event receiver lagged");
        }
    });
    let db = state.db.clone();

    let events = stream::once(async {})
        .chain(changes)
        .then(move |()| {
            let db = db.clone();
            async move { Ok::<_, Infallible>(active_theme_event(&db).await) }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}
