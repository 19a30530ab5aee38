use atelier::AtelierError;
use atelier::db::{ComponentCreate, ComponentFilter, ComponentPatch, SearchFilter};
use atelier_schema::{Category, VariantGroups};
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

fn component(name: &str, category: Category, description: &str) -> ComponentCreate {
    ComponentCreate {
        name: name.to_string(),
        description: description.to_string(),
        category,
        code: format!("export function {}() {{ return null }}", name.replace(' ', "")),
        ..Default::default()
    }
}

fn groups(pairs: &[(&str, &[&str])]) -> VariantGroups {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
        .collect()
}

#[tokio::test]
async fn variants_round_trip_verbatim() {
    let db = atelier::db::spawn(&temp_database_url("components-variants"))
        .await
        .expect("spawn db actor");

    let variants = groups(&[
        ("Size", &["SM", "md", "Lg"]),
        ("variant", &["default", "destructive"]),
    ]);
    let mut create = component("Icon Button", Category::Buttons, "A button with an icon");
    create.variants = variants.clone();

    let row = db.create_component(create).await.unwrap();
    assert_eq!(row.slug, "icon-button");
    assert_eq!(row.variants.0, variants);

    let fetched = db.get_component_by_slug("icon-button").await.unwrap();
    assert_eq!(fetched.variants.0, variants);
    assert_eq!(fetched.category, "buttons");
}

#[tokio::test]
async fn list_filters_by_category_and_respects_limit() {
    let db = atelier::db::spawn(&temp_database_url("components-list"))
        .await
        .expect("spawn db actor");

    db.create_component(component("Button", Category::Buttons, "Clickable"))
        .await
        .unwrap();
    db.create_component(component("Toggle", Category::Buttons, "Two states"))
        .await
        .unwrap();
    db.create_component(component("Input", Category::Inputs, "Text field"))
        .await
        .unwrap();

    let all = db
        .list_components(ComponentFilter {
            category: None,
            limit: 100,
        })
        .await
        .unwrap();
    let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Button", "Input", "Toggle"]);

    let buttons = db
        .list_components(ComponentFilter {
            category: Some("buttons".into()),
            limit: 100,
        })
        .await
        .unwrap();
    assert_eq!(buttons.len(), 2);

    let limited = db
        .list_components(ComponentFilter {
            category: None,
            limit: 1,
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    let unknown = db
        .list_components(ComponentFilter {
            category: Some("button".into()),
            limit: 100,
        })
        .await
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn search_matches_name_description_and_category() {
    let db = atelier::db::spawn(&temp_database_url("components-search"))
        .await
        .expect("spawn db actor");

    db.create_component(component("Button", Category::Buttons, "Clickable action"))
        .await
        .unwrap();
    db.create_component(component("Dialog", Category::Overlays, "Modal window"))
        .await
        .unwrap();
    db.create_component(component("Toast", Category::Feedback, "Transient message"))
        .await
        .unwrap();

    let search = |query: &str, category: Option<&str>| SearchFilter {
        query: query.to_string(),
        category: category.map(str::to_string),
        limit: 50,
    };

    let hits = db.search_components(search("BUTT", None)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].slug, "button");

    let hits = db.search_components(search("modal", None)).await.unwrap();
    assert_eq!(hits[0].slug, "dialog");

    let hits = db.search_components(search("overlays", None)).await.unwrap();
    assert_eq!(hits[0].slug, "dialog");

    let hits = db
        .search_components(search("a", Some("feedback")))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].slug, "toast");

    let hits = db
        .search_components(search("a", Some("widgets")))
        .await
        .unwrap();
    assert!(hits.is_empty());

    let err = db.search_components(search("   ", None)).await.unwrap_err();
    assert!(matches!(err, AtelierError::BadRequest(_)));
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let db = atelier::db::spawn(&temp_database_url("components-search-unicode"))
        .await
        .expect("spawn db actor");

    db.create_component(component("Über Card", Category::Layout, "Ärmel surface"))
        .await
        .unwrap();
    db.create_component(component("Plain Card", Category::Layout, "Surface"))
        .await
        .unwrap();

    let search = |query: &str| SearchFilter {
        query: query.to_string(),
        category: None,
        limit: 50,
    };

    for query in ["Über", "über", "ÜBER", "ärmel"] {
        let hits = db.search_components(search(query)).await.unwrap();
        assert_eq!(hits.len(), 1, "query {query}");
        assert_eq!(hits[0].name, "Über Card");
    }

    let hits = db.search_components(search("card")).await.unwrap();
    let names: Vec<_> = hits.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Plain Card", "Über Card"]);

    let limited = SearchFilter {
        limit: 1,
        ..search("card")
    };
    assert_eq!(db.search_components(limited).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_slug_conflicts_and_upsert_replaces() {
    let db = atelier::db::spawn(&temp_database_url("components-dup"))
        .await
        .expect("spawn db actor");

    let first = db
        .create_component(component("Card", Category::Layout, "Surface"))
        .await
        .unwrap();
    let err = db
        .create_component(component("Card", Category::Layout, "Another"))
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::Conflict(_)));

    let replaced = db
        .upsert_component(component("Card", Category::DataDisplay, "Replaced"))
        .await
        .unwrap();
    assert_eq!(replaced.id, first.id);
    assert_eq!(replaced.description, "Replaced");
    assert_eq!(replaced.category, "data-display");
}

#[tokio::test]
async fn update_and_delete_report_missing_rows() {
    let db = atelier::db::spawn(&temp_database_url("components-update"))
        .await
        .expect("spawn db actor");

    let row = db
        .create_component(component("Badge", Category::DataDisplay, "Label"))
        .await
        .unwrap();
    let updated = db
        .update_component(
            row.id,
            ComponentPatch {
                description: Some("Small status label".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Small status label");
    assert_eq!(updated.name, "Badge");

    db.delete_component(row.id).await.unwrap();
    let err = db.delete_component(row.id).await.unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
    let err = db
        .update_component(row.id, ComponentPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
}

#[tokio::test]
async fn normalize_variants_lowercases_legacy_rows() {
    let db = atelier::db::spawn(&temp_database_url("components-normalize"))
        .await
        .expect("spawn db actor");

    let mut legacy = component("Alert", Category::Feedback, "Callout");
    legacy.variants = groups(&[
        ("Variant", &["Default", "Destructive"]),
        ("variant", &["default", "warning"]),
    ]);
    let legacy = db.create_component(legacy).await.unwrap();

    let mut modern = component("Tabs", Category::Navigation, "Tabbed panels");
    modern.variants = groups(&[("size", &["sm"])]);
    db.create_component(modern).await.unwrap();

    let rewritten = db.normalize_component_variants().await.unwrap();
    assert_eq!(rewritten, 1);

    let alert = db.get_component(legacy.id).await.unwrap();
    assert_eq!(
        alert.variants.0,
        groups(&[("variant", &["default", "destructive", "warning"])])
    );

    assert_eq!(db.normalize_component_variants().await.unwrap(), 0);
}
