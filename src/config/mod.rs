mod bootstrap_settings;
mod database;
mod logging;

pub use bootstrap_settings::BootstrapSettings;
pub use database::{init_database, migrate_database};
pub use logging::{init_logging, LoggingConfig, LoggingError};
