// Stores layer - Data access and repository pattern
pub mod plan_store;
pub mod role_store;
pub mod user_store;

pub use plan_store::PlanStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;
