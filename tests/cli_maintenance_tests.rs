use atelier::auth::{Role, verify_password};
use atelier::cli::{Command, Outcome, run_maintenance};
use atelier::db::ComponentCreate;
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

#[tokio::test]
async fn seed_is_idempotent_and_activates_light() {
    let db = atelier::db::spawn(&temp_database_url("cli-seed"))
        .await
        .expect("spawn db actor");

    let outcome = run_maintenance(&db, Command::Seed).await.unwrap();
    match outcome {
        Outcome::Seeded(report) => {
            assert_eq!(report.themes, 2);
            assert_eq!(report.components, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let active = db.get_active_theme().await.unwrap().expect("active theme");
    assert_eq!(active.value, "light");
    let button = db.get_component_by_slug("button").await.unwrap();
    assert!(button.variants.0.contains_key("variant"));

    match run_maintenance(&db, Command::Seed).await.unwrap() {
        Outcome::Seeded(report) => {
            assert_eq!(report.themes, 0);
            assert_eq!(report.components, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(db.list_themes().await.unwrap().len(), 2);
}

#[tokio::test]
async fn account_commands_store_hashed_passwords() {
    let db = atelier::db::spawn(&temp_database_url("cli-accounts"))
        .await
        .expect("spawn db actor");

    run_maintenance(
        &db,
        Command::SetAdminPassword {
            password: "admin password".into(),
        },
    )
    .await
    .unwrap();
    let hash = db.get_admin_password_hash().await.unwrap().expect("hash");
    assert!(verify_password("admin password", &hash));
    assert!(!verify_password("nope", &hash));

    let outcome = run_maintenance(
        &db,
        Command::AddUser {
            email: "Writer@Example.com".into(),
            role: Role::Editor,
            password: "writer password".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(
        outcome,
        Outcome::UserSaved {
            email: "writer@example.com".into(),
            role: Role::Editor,
        }
    );

    // Re-adding updates the role in place.
    run_maintenance(
        &db,
        Command::AddUser {
            email: "writer@example.com".into(),
            role: Role::Admin,
            password: "writer password".into(),
        },
    )
    .await
    .unwrap();
    let user = db
        .get_user_by_email("writer@example.com")
        .await
        .unwrap()
        .expect("user");
    assert_eq!(user.role, "admin");

    assert!(
        run_maintenance(
            &db,
            Command::AddUser {
                email: "not-an-email".into(),
                role: Role::Editor,
                password: "writer password".into(),
            },
        )
        .await
        .is_err()
    );
    assert!(
        run_maintenance(
            &db,
            Command::SetAdminPassword {
                password: "short".into(),
            },
        )
        .await
        .is_err()
    );
}

#[tokio::test]
async fn normalize_variants_command_reports_rewritten_rows() {
    let db = atelier::db::spawn(&temp_database_url("cli-normalize"))
        .await
        .expect("spawn db actor");
    db.create_component(ComponentCreate {
        name: "Legacy".into(),
        variants: BTreeMap::from([("Size".to_string(), vec!["SM".to_string()])]),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(
        run_maintenance(&db, Command::NormalizeVariants).await.unwrap(),
        Outcome::VariantsNormalized(1)
    );
    let row = db.get_component_by_slug("legacy").await.unwrap();
    assert_eq!(row.variants.0["size"], vec!["sm".to_string()]);
}
