use std::env;

/// Bootstrap settings for infrastructure configuration.
///
/// Loaded once from the environment before anything else comes up.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    database_url: String,
}

impl BootstrapSettings {
    /// Load bootstrap settings from environment variables.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://paceline.db?mode=rwc".to_string());

        Self { database_url }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
