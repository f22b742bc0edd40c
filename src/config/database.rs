use crate::config::BootstrapSettings;
use crate::errors::internal::DatabaseError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Connect to the database. Does NOT run migrations - call
/// [`migrate_database`] separately once the connection is up.
pub async fn init_database(
    settings: &BootstrapSettings,
) -> Result<DatabaseConnection, DatabaseError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| DatabaseError::operation("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Bring the schema up to date.
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| DatabaseError::operation("migrate_database", e))?;

    tracing::debug!("Database migrations applied");

    Ok(())
}
