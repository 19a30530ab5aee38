use atelier::AtelierError;
use atelier::db::{ThemeCreate, ThemeEvent, ThemePatch};
use std::collections::BTreeMap;
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

fn theme(name: &str, value: &str, is_active: bool) -> ThemeCreate {
    ThemeCreate {
        name: name.to_string(),
        value: value.to_string(),
        colors: BTreeMap::from([("primary".to_string(), "#111111".to_string())]),
        is_active,
        ..Default::default()
    }
}

#[tokio::test]
async fn activating_dark_deactivates_light() {
    let db = atelier::db::spawn(&temp_database_url("themes-dark-light"))
        .await
        .expect("spawn db actor");

    let light = db.create_theme(theme("Light", "light", true)).await.unwrap();
    let dark = db.create_theme(theme("Dark", "dark", false)).await.unwrap();
    assert!(light.is_active);
    assert!(!dark.is_active);

    let active = db.get_active_theme().await.unwrap().expect("an active theme");
    assert_eq!(active.value, "light");

    let dark = db
        .update_theme(
            dark.id,
            ThemePatch {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(dark.is_active);

    let themes = db.list_themes().await.unwrap();
    let active: Vec<_> = themes.iter().filter(|t| t.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].value, "dark");

    // Creating an active theme also flips the previous one.
    let contrast = db
        .create_theme(theme("High Contrast", "contrast", true))
        .await
        .unwrap();
    let active = db.get_active_theme().await.unwrap().unwrap();
    assert_eq!(active.id, contrast.id);
    assert!(!db.get_theme(dark.id).await.unwrap().is_active);
}

#[tokio::test]
async fn concurrent_activations_leave_one_active_theme() {
    let db = atelier::db::spawn(&temp_database_url("themes-concurrent"))
        .await
        .expect("spawn db actor");

    let mut ids = Vec::new();
    for i in 0..6 {
        let row = db
            .create_theme(theme(&format!("Theme {i}"), &format!("theme-{i}"), false))
            .await
            .unwrap();
        ids.push(row.id);
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let db = db.clone();
            tokio::spawn(async move { db.activate_theme(id).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("activate");
    }

    let active = db
        .list_themes()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.is_active)
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn deleting_active_theme_is_rejected_and_missing_is_404() {
    let db = atelier::db::spawn(&temp_database_url("themes-delete"))
        .await
        .expect("spawn db actor");

    let light = db.create_theme(theme("Light", "light", true)).await.unwrap();
    let dark = db.create_theme(theme("Dark", "dark", false)).await.unwrap();

    let err = db.delete_theme(light.id).await.unwrap_err();
    assert!(matches!(err, AtelierError::ActiveThemeDeletion));
    assert_eq!(db.list_themes().await.unwrap().len(), 2);

    db.delete_theme(dark.id).await.unwrap();
    assert_eq!(db.list_themes().await.unwrap().len(), 1);

    let err = db.delete_theme(dark.id).await.unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));

    let err = db.activate_theme(9_999).await.unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_value_is_a_conflict() {
    let db = atelier::db::spawn(&temp_database_url("themes-dup"))
        .await
        .expect("spawn db actor");

    db.create_theme(theme("Light", "light", false)).await.unwrap();
    let err = db
        .create_theme(theme("Light again", "light", false))
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::Conflict(_)));
}

#[tokio::test]
async fn theme_changes_are_broadcast() {
    let db = atelier::db::spawn(&temp_database_url("themes-events"))
        .await
        .expect("spawn db actor");
    let mut events = db.subscribe_theme_events();

    let light = db.create_theme(theme("Light", "light", false)).await.unwrap();
    db.activate_theme(light.id).await.unwrap();

    assert_eq!(events.recv().await.unwrap(), ThemeEvent::Created(light.id));
    assert_eq!(events.recv().await.unwrap(), ThemeEvent::Activated(light.id));
}
