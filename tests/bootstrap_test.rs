use paceline_backend::app_data::AppData;
use paceline_backend::config::{init_database, init_logging, migrate_database, BootstrapSettings};
use paceline_backend::services::RoleService;

#[tokio::test]
async fn bootstrap_connects_migrates_and_serves_the_seeded_catalog() {
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    init_logging().expect("logging should initialize once per process");

    let settings = BootstrapSettings::from_env();
    assert_eq!(settings.database_url(), "sqlite::memory:");

    let db = init_database(&settings).await.unwrap();
    migrate_database(&db).await.unwrap();

    let app_data = AppData::new(db);
    let service = RoleService::new(app_data.clone());

    let user = app_data
        .user_store
        .create_user(&app_data.db, "bootstrapper", None)
        .await
        .unwrap();
    service
        .assign_roles(user.id, &["user".to_string()])
        .await
        .unwrap();

    assert!(service.has_permission(user.id, "plan:read").await.unwrap());
    assert!(!service.has_permission(user.id, "user:delete").await.unwrap());
}
