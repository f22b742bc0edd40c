use crate::stores::{PlanStore, RoleStore, UserStore};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Centralized application data following the main-owned stores pattern.
///
/// The connection and stores are created once and shared; services extract
/// what they need and keep stable constructor signatures.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub plan_store: Arc<PlanStore>,
}

impl AppData {
    /// Wire up stores over an initialized (and migrated) connection.
    pub fn new(db: DatabaseConnection) -> Arc<Self> {
        tracing::debug!("Creating stores...");
        Arc::new(Self {
            db,
            user_store: Arc::new(UserStore::new()),
            role_store: Arc::new(RoleStore::new()),
            plan_store: Arc::new(PlanStore::new()),
        })
    }
}
