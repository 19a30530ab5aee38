use atelier::db::{ComponentCreate, ThemeCreate};
use atelier::mcp::{
    AtelierMcp, GetComponentRequest, GetThemeRequest, ListComponentsRequest,
    SearchComponentsRequest,
};
use atelier_schema::Category;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

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

fn text_json(result: &CallToolResult) -> Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .expect("tool returned text");
    serde_json::from_str(&text).expect("tool text is JSON")
}

async fn server(tag: &str) -> AtelierMcp {
    let db = atelier::db::spawn(&temp_database_url(tag))
        .await
        .expect("spawn db actor");
    db.create_theme(ThemeCreate {
        name: "Light".into(),
        value: "light".into(),
        is_active: true,
        ..Default::default()
    })
    .await
    .unwrap();
    db.create_component(ComponentCreate {
        name: "Button".into(),
        description: "Clickable action".into(),
        category: Category::Buttons,
        ..Default::default()
    })
    .await
    .unwrap();
    db.create_component(ComponentCreate {
        name: "Dialog".into(),
        description: "Modal window".into(),
        category: Category::Overlays,
        ..Default::default()
    })
    .await
    .unwrap();
    AtelierMcp::new(db)
}

#[tokio::test]
async fn tools_return_public_envelopes() {
    let mcp = server("mcp-tools").await;

    let result = mcp
        .list_components(Parameters(ListComponentsRequest::default()))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert_eq!(text_json(&result)["count"], 2);

    let result = mcp
        .list_components(Parameters(ListComponentsRequest {
            category: Some("overlays".into()),
        }))
        .await
        .unwrap();
    assert_eq!(text_json(&result)["components"][0]["slug"], "dialog");

    let result = mcp
        .search_components(Parameters(SearchComponentsRequest {
            query: "click".into(),
            category: None,
        }))
        .await
        .unwrap();
    let json = text_json(&result);
    assert_eq!(json["count"], 1);
    assert_eq!(json["query"], "click");

    let result = mcp
        .get_component(Parameters(GetComponentRequest {
            slug: "button".into(),
        }))
        .await
        .unwrap();
    assert_eq!(text_json(&result)["name"], "Button");

    let result = mcp.list_themes().await.unwrap();
    assert_eq!(text_json(&result)["themes"][0]["value"], "light");

    let result = mcp
        .get_theme(Parameters(GetThemeRequest {
            value: "light".into(),
        }))
        .await
        .unwrap();
    assert_eq!(text_json(&result)["is_active"], true);
}

#[tokio::test]
async fn lookup_failures_are_tool_errors() {
    let mcp = server("mcp-errors").await;

    let result = mcp
        .get_component(Parameters(GetComponentRequest {
            slug: "missing".into(),
        }))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_json(&result)["error"], "Component not found");

    let result = mcp
        .get_theme(Parameters(GetThemeRequest {
            value: "sepia".into(),
        }))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_json(&result)["error"], "Theme not found");

    let result = mcp
        .search_components(Parameters(SearchComponentsRequest {
            query: " ".into(),
            category: None,
        }))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
}

#[tokio::test]
async fn unknown_category_lists_nothing() {
    let mcp = server("mcp-unknown-category").await;

    let result = mcp
        .list_components(Parameters(ListComponentsRequest {
            category: Some("button".into()),
        }))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert_eq!(text_json(&result)["count"], 0);

    let result = mcp
        .search_components(Parameters(SearchComponentsRequest {
            query: "click".into(),
            category: Some("form".into()),
        }))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert_eq!(text_json(&result)["count"], 0);
}

#[tokio::test]
async fn list_components_returns_the_whole_catalog() {
    let db = atelier::db::spawn(&temp_database_url("mcp-list-all"))
        .await
        .expect("spawn db actor");
    for i in 0..120 {
        db.create_component(ComponentCreate {
            name: format!("Widget {i:03}"),
            category: Category::Other,
            ..Default::default()
        })
        .await
        .unwrap();
    }
    let mcp = AtelierMcp::new(db);

    let result = mcp
        .list_components(Parameters(ListComponentsRequest::default()))
        .await
        .unwrap();
    assert_eq!(text_json(&result)["count"], 120);
}
