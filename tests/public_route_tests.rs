use atelier::config::Config;
use atelier::db::{ComponentCreate, ThemeCreate};
use atelier::server::{AtelierState, atelier_router};
use atelier_schema::Category;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

fn temp_database_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "atelier-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    format!("sqlite:{}", path.display())
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response is not JSON")
    };
    (status, json)
}

#[tokio::test]
async fn public_read_api_serves_themes_and_components() {
    let db = atelier::db::spawn(&temp_database_url("public-routes"))
        .await
        .expect("spawn db actor");
    let state = AtelierState::new(db.clone(), &Config::default()).expect("state");
    let app = atelier_router(state);

    // No active theme yet.
    let (status, body) = get(&app, "/api/public/active-theme").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No active theme");

    db.create_theme(ThemeCreate {
        name: "Light".into(),
        value: "light".into(),
        colors: BTreeMap::from([("background".into(), "#ffffff".into())]),
        is_active: true,
        ..Default::default()
    })
    .await
    .unwrap();
    db.create_theme(ThemeCreate {
        name: "Dark".into(),
        value: "dark".into(),
        ..Default::default()
    })
    .await
    .unwrap();
    db.create_component(ComponentCreate {
        name: "Button".into(),
        description: "Clickable action".into(),
        category: Category::Buttons,
        variants: BTreeMap::from([("size".into(), vec!["sm".into(), "lg".into()])]),
        ..Default::default()
    })
    .await
    .unwrap();
    db.create_component(ComponentCreate {
        name: "Input".into(),
        description: "Single-line text field".into(),
        category: Category::Inputs,
        ..Default::default()
    })
    .await
    .unwrap();

    let (status, body) = get(&app, "/api/public/themes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["themes"][0]["value"], "dark");

    let (status, body) = get(&app, "/api/public/themes/light").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["colors"]["background"], "#ffffff");
    assert_eq!(body["is_active"], true);

    let (status, _) = get(&app, "/api/public/themes/sepia").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/public/active-theme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "light");

    let (status, body) = get(&app, "/api/public/components?category=buttons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["components"][0]["slug"], "button");
    assert_eq!(body["components"][0]["variants"]["size"][1], "lg");

    let (status, body) = get(&app, "/api/public/components?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, _) = get(&app, "/api/public/components?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/api/public/components?category=widgets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = get(&app, "/api/public/components/input").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "inputs");

    let (status, body) = get(&app, "/api/public/components/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Component not found");

    let (status, body) = get(&app, "/api/public/search?q=TEXT").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["query"], "TEXT");
    assert_eq!(body["results"][0]["slug"], "input");

    let (status, body) = get(&app, "/api/public/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("q"));

    let (status, _) = get(&app, "/api/public/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_routes_allow_any_origin() {
    let db = atelier::db::spawn(&temp_database_url("public-cors"))
        .await
        .expect("spawn db actor");
    let state = AtelierState::new(db, &Config::default()).expect("state");
    let app = atelier_router(state);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/public/themes")
                .header(header::ORIGIN, "https://docs.example.com")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(resp.headers().contains_key("x-request-id"));
}

async fn next_frame<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    use futures::StreamExt;
    let chunk = tokio::time::timeout(std::time::Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for an event")
        .expect("stream ended")
        .expect("stream error");
    String::from_utf8(chunk.to_vec()).expect("utf-8 frame")
}

#[tokio::test]
async fn active_theme_events_push_changes() {
    let db = atelier::db::spawn(&temp_database_url("public-sse"))
        .await
        .expect("spawn db actor");
    let state = AtelierState::new(db.clone(), &Config::default()).expect("state");
    let app = atelier_router(state);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/public/active-theme/events")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/event-stream"))
    );

    let mut frames = resp.into_body().into_data_stream();
    let first = next_frame(&mut frames).await;
    assert!(first.contains("event: active-theme"));
    assert!(first.contains("data: null"));

    db.create_theme(ThemeCreate {
        name: "Dark".into(),
        value: "dark".into(),
        is_active: true,
        ..Default::default()
    })
    .await
    .unwrap();

    let second = next_frame(&mut frames).await;
    assert!(second.contains("event: active-theme"));
    assert!(second.contains("\"value\":\"dark\""));
}
